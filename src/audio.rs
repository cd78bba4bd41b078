//! Playback driver: a dedicated audio thread fed by a command channel.
//!
//! The UI loads one file at a time and plays or stops it. Playback state is
//! published through a shared `PlaybackHandle` the UI reads every frame.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioCmd, PlaybackDriver, PlaybackHandle, PlaybackInfo};
