use std::path::PathBuf;

use crate::error::FetchError;

/// One remote search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub remote_id: String,
    pub channel: String,
}

/// A remote catalog that can be searched and downloaded from.
///
/// Implementations block; callers run them on the fetch worker.
pub trait TrackFetcher: Send {
    /// Search by free text. May return an empty list.
    fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>, FetchError>;

    /// Download `remote_id` and return the local path of the playable file.
    fn fetch_to_local(&self, remote_id: &str, title: &str) -> Result<PathBuf, FetchError>;
}

/// Result of a download, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Set only when the file was written.
    pub local_path: Option<PathBuf>,
    pub status: String,
}

#[derive(Debug)]
pub enum FetchCmd {
    /// Search the remote catalog.
    Search { query: String, limit: u32 },
    /// Download the given hit.
    Download(SearchHit),
    /// Stop the worker thread.
    Quit,
}

#[derive(Debug, Clone)]
pub enum FetchEvent {
    /// A search finished. `hits` is empty on failure.
    SearchDone { hits: Vec<SearchHit>, status: String },
    /// A download finished, successfully or not.
    Downloaded { hit: SearchHit, outcome: FetchOutcome },
}
