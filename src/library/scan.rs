use std::path::{Path, PathBuf};

use lofty::file::TaggedFileExt;
use lofty::tag::Accessor;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

/// An audio file found on disk, with whatever tags it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedTrack {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Walk `dir` and return its audio files, sorted case-insensitively by path.
///
/// Title falls back to the file stem when the file has no readable tags.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<ScannedTrack> {
    let mut tracks: Vec<ScannedTrack> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let mut title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let mut artist: Option<String> = None;

        if let Ok(tagged) = lofty::read_from_path(path) {
            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.title() {
                    if !v.trim().is_empty() {
                        title = v.trim().to_string();
                    }
                }
                if let Some(v) = tag.artist() {
                    let v = v.trim();
                    if !v.is_empty() {
                        artist = Some(v.to_string());
                    }
                }
            }
        }

        tracks.push(ScannedTrack {
            path: path.to_path_buf(),
            title,
            artist,
        });
    }

    tracks.sort_by_key(|t| t.path.to_string_lossy().to_lowercase());
    tracks
}
