use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::FetchError;

const MAX_FILENAME_LEN: usize = 100;

/// Reduce `title` to ASCII letters and digits, at most 100 of them.
pub fn sanitize_filename(title: &str) -> String {
    title
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_FILENAME_LEN)
        .collect()
}

/// Local file name for a download: the sanitized title, or the remote id
/// when nothing of the title survives sanitizing.
pub(super) fn file_stem_for(remote_id: &str, title: &str) -> String {
    let stem = sanitize_filename(title);
    if stem.is_empty() {
        sanitize_filename(remote_id)
    } else {
        stem
    }
}

/// Options for one external downloader run.
pub(super) struct Downloader<'a> {
    pub program: &'a str,
    pub audio_quality: &'a str,
    pub dir: &'a Path,
}

impl Downloader<'_> {
    /// Run the downloader for `url`, extracting mp3 audio to `<dir>/<stem>.mp3`.
    pub fn run(&self, url: &str, stem: &str) -> Result<PathBuf, FetchError> {
        fs::create_dir_all(self.dir).map_err(|source| FetchError::Io {
            path: self.dir.to_path_buf(),
            source,
        })?;

        let target = self.dir.join(format!("{stem}.mp3"));
        let template = self.dir.join(format!("{stem}.%(ext)s"));

        debug!(program = self.program, url, target = %target.display(), "starting download");
        let output = Command::new(self.program)
            .args(["--format", "bestaudio/best"])
            .args(["--extract-audio", "--audio-format", "mp3"])
            .args(["--audio-quality", self.audio_quality])
            .args(["--no-playlist", "--quiet", "--no-warnings", "--output"])
            .arg(&template)
            .arg(url)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| FetchError::Spawn {
                program: self.program.to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("exited with {}", output.status));
            return Err(FetchError::Download(reason));
        }

        if !target.is_file() {
            return Err(FetchError::Download(format!(
                "no file was produced at {}",
                target.display()
            )));
        }

        info!(target = %target.display(), "download finished");
        Ok(target)
    }
}
