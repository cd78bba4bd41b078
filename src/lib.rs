//! JukeBox: a terminal jukebox over a flat-file track catalog.
//!
//! The catalog (`catalog::CatalogStore`) is the one source of truth. The
//! TUI screens, the playback driver and the remote fetcher are all thin
//! clients of it.

pub mod app;
pub mod audio;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod library;
pub mod runtime;
pub mod ui;
pub mod validate;

pub use catalog::{CatalogStore, NewTrack, TrackRecord};
pub use error::{AudioError, CatalogError, FetchError, InputError};
