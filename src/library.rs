//! Local import: scan a music folder and add the audio files the catalog
//! does not know yet.

mod import;
mod scan;

pub use import::{ImportReport, import_dir};
pub use scan::{ScannedTrack, scan};
