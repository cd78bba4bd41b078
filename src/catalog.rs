//! Track catalog: the record type, the file-backed store and the helpers the
//! screens use to present and search it.

mod display;
mod ids;
mod model;
mod search;
mod store;

pub use display::{format_rating, list_line};
pub use ids::next_track_id;
pub use model::{HEADER, NewTrack, TrackRecord};
pub use search::fuzzy_match_positions;
pub use store::{CatalogStore, NOT_FOUND};

#[cfg(test)]
mod tests;
