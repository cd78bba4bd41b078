//! Utilities for creating `rodio` sinks from files on disk.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink};

use crate::error::AudioError;

/// Create a paused `Sink` for the file at `path`.
pub(super) fn create_sink(stream: &OutputStream, path: &Path) -> Result<Sink, AudioError> {
    let file = File::open(path).map_err(|_| AudioError::Unavailable(path.to_path_buf()))?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
