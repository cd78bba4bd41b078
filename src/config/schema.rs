use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/jukebox/config.toml` or `~/.config/jukebox/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `JUKEBOX__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub fetch: FetchSettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// The delimited catalog file every screen reads and rewrites.
    pub path: PathBuf,
    /// Folder scanned by the "import" action.
    pub music_dir: PathBuf,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("songs_list.csv"),
            music_dir: PathBuf::from("music"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Key for the video search API. Searching is disabled while empty.
    pub api_key: String,
    /// Base URL of the search endpoint.
    pub api_base_url: String,
    /// Maximum number of hits requested per search.
    pub search_limit: u32,
    /// HTTP timeout for the search request (seconds).
    pub timeout_secs: u64,
    /// Downloader executable, looked up on `PATH` when not absolute.
    pub downloader: String,
    /// Audio quality passed to the downloader's mp3 extraction.
    pub audio_quality: String,
    /// Where downloaded tracks are written.
    pub download_dir: PathBuf,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://www.googleapis.com/youtube/v3/search".to_string(),
            search_limit: 10,
            timeout_secs: 30,
            downloader: "yt-dlp".to_string(),
            audio_quality: "192K".to_string(),
            download_dir: PathBuf::from("music"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Render ratings as `★★★☆☆` instead of a bare number.
    pub rating_stars: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ JukeBox ~ ".to_string(),
            rating_stars: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log file. The terminal belongs to the UI, so logs never go to stderr.
    pub file: PathBuf,
    /// Default filter directive, overridden by `JUKEBOX_LOG`.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("jukebox.log"),
            level: "info".to_string(),
        }
    }
}
