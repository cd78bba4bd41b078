use std::path::Path;

use tracing::info;

use crate::catalog::{CatalogStore, NewTrack};
use crate::config::LibrarySettings;
use crate::error::CatalogError;

use super::scan::scan;

/// What an import pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub skipped: usize,
}

/// Add every audio file under `dir` whose path is not already a catalog
/// source. New entries are unrated with no plays.
pub fn import_dir(
    store: &mut CatalogStore,
    dir: &Path,
    settings: &LibrarySettings,
) -> Result<ImportReport, CatalogError> {
    let mut report = ImportReport::default();

    for track in scan(dir, settings) {
        let source = track.path.to_string_lossy().into_owned();
        if store.has_source(&source) {
            report.skipped += 1;
            continue;
        }
        store.add_track(NewTrack {
            name: track.title,
            artist: track.artist.unwrap_or_default(),
            source,
            rating: 0,
        })?;
        report.added += 1;
    }

    info!(dir = %dir.display(), added = report.added, skipped = report.skipped, "import finished");
    Ok(report)
}
