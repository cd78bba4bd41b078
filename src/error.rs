//! Error types shared across the catalog, fetcher, audio and input layers.
//!
//! Lookup misses are never errors here; they are modelled with `Option`
//! (or a `bool` for mutations) by the callers.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or writing the catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("refusing to overwrite {path}, it could not be read: {reason}")]
    Unreadable { path: PathBuf, reason: String },
}

/// Failures of the remote search or the local download.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no search API key configured (set fetch.api_key)")]
    MissingApiKey,
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search service answered with status {0}")]
    Status(u16),
    #[error("unexpected search response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("could not start downloader `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("downloader failed: {0}")]
    Download(String),
    #[error("could not prepare download folder {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of the playback driver.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("track file not found: {0}")]
    Unavailable(PathBuf),
    #[error("cannot decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
    #[error("audio thread is gone")]
    Disconnected,
}

/// Rejected user input, caught before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("track id must not be empty")]
    EmptyTrackId,
    #[error("track id must be numeric")]
    NonNumericTrackId,
    #[error("track id should start at 0 => 01, 02, etc")]
    MissingLeadingZero,
    #[error("rating must be a number from 1 to 5")]
    RatingOutOfRange,
    #[error("both name and artist must be provided")]
    EmptyNameOrArtist,
    #[error("please enter a search term")]
    EmptyQuery,
}
