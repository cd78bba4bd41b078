//! Audio command, state and driver types.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::AudioError;

#[derive(Debug)]
pub enum AudioCmd {
    /// Open and decode a file, leaving it paused at the start.
    Load(PathBuf),
    /// Start or resume the loaded file.
    Play,
    /// Stop playback and drop the loaded file.
    Stop,
    /// Toggle pause/resume.
    TogglePause,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// The file currently loaded, if any.
    pub path: Option<PathBuf>,
    /// Elapsed playback time for the current file.
    pub elapsed: Duration,
    /// Whether audio is currently coming out.
    pub playing: bool,
    /// Last failure reported by the audio thread.
    pub error: Option<String>,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// What the screens need from a player.
pub trait PlaybackDriver {
    /// Queue `path` for playback. Fails when the file is not there.
    fn load(&self, path: &Path) -> Result<(), AudioError>;
    fn play(&self) -> Result<(), AudioError>;
    fn stop(&self) -> Result<(), AudioError>;
    fn toggle_pause(&self) -> Result<(), AudioError>;
}
