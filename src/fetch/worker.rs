use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use super::types::{FetchCmd, FetchEvent, FetchOutcome, SearchHit, TrackFetcher};

/// Handle to the background fetch thread.
pub struct FetchWorker {
    tx: Sender<FetchCmd>,
    rx: Receiver<FetchEvent>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl FetchWorker {
    pub fn spawn(fetcher: impl TrackFetcher + 'static) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<FetchCmd>();
        let (event_tx, event_rx) = mpsc::channel::<FetchEvent>();

        let handle = thread::spawn(move || run(fetcher, cmd_rx, event_tx));

        Self {
            tx: cmd_tx,
            rx: event_rx,
            join: Mutex::new(Some(handle)),
        }
    }

    pub fn send(&self, cmd: FetchCmd) -> Result<(), mpsc::SendError<FetchCmd>> {
        self.tx.send(cmd)
    }

    /// Next finished result, if any. Never blocks.
    pub fn try_recv(&self) -> Option<FetchEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the next result arrives. `None` once the worker is gone.
    pub fn recv(&self) -> Option<FetchEvent> {
        self.rx.recv().ok()
    }

    /// Ask the worker to stop and wait for it. An in-flight fetch is not
    /// interrupted; this returns once it completes.
    pub fn shutdown(&self) {
        let _ = self.send(FetchCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

fn run(fetcher: impl TrackFetcher, rx: Receiver<FetchCmd>, tx: Sender<FetchEvent>) {
    while let Ok(cmd) = rx.recv() {
        let event = match cmd {
            FetchCmd::Quit => break,
            FetchCmd::Search { query, limit } => search(&fetcher, &query, limit),
            FetchCmd::Download(hit) => download(&fetcher, hit),
        };
        if tx.send(event).is_err() {
            break;
        }
    }
}

fn search(fetcher: &impl TrackFetcher, query: &str, limit: u32) -> FetchEvent {
    match fetcher.search(query, limit) {
        Ok(hits) if hits.is_empty() => FetchEvent::SearchDone {
            hits,
            status: "No results found.".to_string(),
        },
        Ok(hits) => {
            let status = format!("Search completed! {} result(s).", hits.len());
            FetchEvent::SearchDone { hits, status }
        }
        Err(e) => {
            warn!(error = %e, query, "search failed");
            FetchEvent::SearchDone {
                hits: Vec::new(),
                status: format!("Search failed: {e}"),
            }
        }
    }
}

fn download(fetcher: &impl TrackFetcher, hit: SearchHit) -> FetchEvent {
    let outcome = match fetcher.fetch_to_local(&hit.remote_id, &hit.title) {
        Ok(path) => {
            info!(title = %hit.title, path = %path.display(), "fetched track");
            let status = format!("{} downloaded successfully to {}.", hit.title, path.display());
            FetchOutcome {
                local_path: Some(path),
                status,
            }
        }
        Err(e) => {
            warn!(error = %e, title = %hit.title, "download failed");
            FetchOutcome {
                local_path: None,
                status: format!("Failed to download {}. Error: {e}", hit.title),
            }
        }
    };
    FetchEvent::Downloaded { hit, outcome }
}
