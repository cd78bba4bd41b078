use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use crate::error::AudioError;

use super::sink::create_sink;
use super::types::{AudioCmd, PlaybackHandle};

/// Playback clock for the loaded file: time accumulated across pauses plus
/// the currently running stretch.
#[derive(Default)]
struct Clock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Clock {
    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }

    fn reset(&mut self) {
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }
}

pub(super) fn spawn_audio_thread(rx: Receiver<AudioCmd>, playback_info: PlaybackHandle) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "no audio output device, playback disabled");
                let reason = AudioError::NoOutputDevice(e.to_string()).to_string();
                let report = || {
                    if let Ok(mut info) = playback_info.lock() {
                        info.error = Some(reason.clone());
                    }
                };
                report();
                // Keep draining so senders never see a closed channel mid-session.
                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        AudioCmd::Quit { .. } => break,
                        AudioCmd::Load(_) => report(),
                        _ => {}
                    }
                }
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped, which would land
        // on top of the TUI.
        stream.log_on_drop(false);

        let mut sink: Option<Sink> = None;
        let mut clock = Clock::default();

        let publish = |sink: &Option<Sink>, clock: &Clock| {
            if let Ok(mut info) = playback_info.lock() {
                info.playing = sink.as_ref().is_some_and(|s| !s.is_paused() && !s.empty());
                info.elapsed = clock.elapsed();
            }
        };

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load(path) => {
                        if let Some(old) = sink.take() {
                            old.stop();
                        }
                        clock.reset();
                        match create_sink(&stream, &path) {
                            Ok(new_sink) => {
                                debug!(path = %path.display(), "loaded track");
                                sink = Some(new_sink);
                                if let Ok(mut info) = playback_info.lock() {
                                    info.path = Some(path);
                                    info.error = None;
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, "could not load track");
                                if let Ok(mut info) = playback_info.lock() {
                                    info.path = None;
                                    info.error = Some(e.to_string());
                                }
                            }
                        }
                        publish(&sink, &clock);
                    }
                    AudioCmd::Play => {
                        if let Some(s) = sink.as_ref() {
                            s.play();
                            clock.start();
                        }
                        publish(&sink, &clock);
                    }
                    AudioCmd::TogglePause => {
                        if let Some(s) = sink.as_ref() {
                            if s.is_paused() {
                                s.play();
                                clock.start();
                            } else {
                                s.pause();
                                clock.pause();
                            }
                        }
                        publish(&sink, &clock);
                    }
                    AudioCmd::Stop => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        clock.reset();
                        if let Ok(mut info) = playback_info.lock() {
                            info.path = None;
                        }
                        publish(&sink, &clock);
                    }
                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(s) = sink.take() {
                            if !s.is_paused() {
                                fade_out_sink(&s, fade_out_ms);
                            }
                            s.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Track ran out on its own.
                    if sink.as_ref().is_some_and(Sink::empty) {
                        clock.pause();
                    }
                    publish(&sink, &clock);
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if let Ok(mut info) = playback_info.lock() {
            info.playing = false;
        }
    })
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    let start = sink.volume();
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(start * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
