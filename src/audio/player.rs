use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::AudioError;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackDriver, PlaybackHandle, PlaybackInfo};

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, playback_info.clone());

        Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), AudioError> {
        self.tx.send(cmd).map_err(|_| AudioError::Disconnected)
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackDriver for AudioPlayer {
    fn load(&self, path: &Path) -> Result<(), AudioError> {
        ensure_available(path)?;
        // Forget the previous failure so the next one is about this file.
        if let Ok(mut info) = self.playback.lock() {
            info.error = None;
        }
        self.send(AudioCmd::Load(path.to_path_buf()))
    }

    fn play(&self) -> Result<(), AudioError> {
        self.send(AudioCmd::Play)
    }

    fn stop(&self) -> Result<(), AudioError> {
        self.send(AudioCmd::Stop)
    }

    fn toggle_pause(&self) -> Result<(), AudioError> {
        self.send(AudioCmd::TogglePause)
    }
}

/// A catalog source that points at nothing is "unavailable", not a crash.
pub(super) fn ensure_available(path: &Path) -> Result<(), AudioError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(AudioError::Unavailable(path.to_path_buf()))
    }
}
