//! Track fetcher: remote search, download to local storage, and the
//! background worker that runs both off the UI thread.
//!
//! The UI sends `FetchCmd`s and drains `FetchEvent`s every tick. Results are
//! always turned into a status line; a failed fetch never touches the catalog.

mod download;
mod types;
mod worker;
mod youtube;

pub use download::sanitize_filename;
pub use types::{FetchCmd, FetchEvent, FetchOutcome, SearchHit, TrackFetcher};
pub use worker::FetchWorker;
pub use youtube::YoutubeFetcher;

#[cfg(test)]
mod tests;
