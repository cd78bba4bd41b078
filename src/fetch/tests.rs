use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::download::{Downloader, file_stem_for};
use super::youtube::parse_search_response;
use super::*;
use crate::error::FetchError;

#[derive(Clone, Default)]
struct FakeFetcher {
    hits: Vec<SearchHit>,
    fail_search: bool,
    fail_download: bool,
    downloads: Arc<Mutex<Vec<String>>>,
}

impl TrackFetcher for FakeFetcher {
    fn search(&self, _query: &str, limit: u32) -> Result<Vec<SearchHit>, FetchError> {
        if self.fail_search {
            return Err(FetchError::Status(403));
        }
        Ok(self.hits.iter().take(limit as usize).cloned().collect())
    }

    fn fetch_to_local(&self, remote_id: &str, title: &str) -> Result<PathBuf, FetchError> {
        self.downloads.lock().unwrap().push(remote_id.to_string());
        if self.fail_download {
            return Err(FetchError::Download("network unreachable".into()));
        }
        Ok(Path::new("music").join(format!("{}.mp3", sanitize_filename(title))))
    }
}

fn hit(title: &str, id: &str) -> SearchHit {
    SearchHit {
        title: title.into(),
        remote_id: id.into(),
        channel: "Some Channel".into(),
    }
}

#[test]
fn sanitize_keeps_ascii_alphanumerics_only() {
    assert_eq!(sanitize_filename("Daft Punk - One More Time!"), "DaftPunkOneMoreTime");
    assert_eq!(sanitize_filename("Beyoncé"), "Beyonc");
    assert_eq!(sanitize_filename(&"a".repeat(150)).len(), 100);
}

#[test]
fn file_stem_falls_back_to_remote_id() {
    assert_eq!(file_stem_for("dQw4w9WgXcQ", "Song"), "Song");
    assert_eq!(file_stem_for("dQw4w9WgXcQ", "【】"), "dQw4w9WgXcQ");
}

#[test]
fn parses_videos_and_skips_other_kinds() {
    let body = r#"{
        "kind": "youtube#searchListResponse",
        "items": [
            {
                "id": { "kind": "youtube#video", "videoId": "abc123" },
                "snippet": { "title": "First Song", "channelTitle": "Chan A" }
            },
            {
                "id": { "kind": "youtube#channel", "channelId": "UC000" },
                "snippet": { "title": "A Channel", "channelTitle": "Chan B" }
            },
            {
                "id": { "kind": "youtube#video", "videoId": "def456" },
                "snippet": { "title": "Second Song", "channelTitle": "Chan C" }
            }
        ]
    }"#;

    let hits = parse_search_response(body).unwrap();
    assert_eq!(
        hits,
        vec![
            SearchHit {
                title: "First Song".into(),
                remote_id: "abc123".into(),
                channel: "Chan A".into(),
            },
            SearchHit {
                title: "Second Song".into(),
                remote_id: "def456".into(),
                channel: "Chan C".into(),
            },
        ]
    );
}

#[test]
fn response_without_items_is_empty_and_garbage_is_an_error() {
    assert!(parse_search_response("{}").unwrap().is_empty());
    assert!(matches!(
        parse_search_response("<html>"),
        Err(FetchError::Decode(_))
    ));
}

#[test]
fn missing_api_key_is_reported_before_any_request() {
    let fetcher = YoutubeFetcher::new(crate::config::FetchSettings::default()).unwrap();
    assert!(matches!(
        fetcher.search("anything", 5),
        Err(FetchError::MissingApiKey)
    ));
}

#[test]
fn worker_hands_search_results_back() {
    let fake = FakeFetcher {
        hits: vec![hit("One", "1"), hit("Two", "2"), hit("Three", "3")],
        ..FakeFetcher::default()
    };
    let worker = FetchWorker::spawn(fake);
    worker
        .send(FetchCmd::Search {
            query: "numbers".into(),
            limit: 2,
        })
        .unwrap();

    match worker.recv().unwrap() {
        FetchEvent::SearchDone { hits, status } => {
            assert_eq!(hits.len(), 2);
            assert!(status.starts_with("Search completed!"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    worker.shutdown();
}

#[test]
fn worker_turns_search_failure_into_empty_hits_and_status() {
    let fake = FakeFetcher {
        fail_search: true,
        ..FakeFetcher::default()
    };
    let worker = FetchWorker::spawn(fake);
    worker
        .send(FetchCmd::Search {
            query: "x".into(),
            limit: 10,
        })
        .unwrap();

    match worker.recv().unwrap() {
        FetchEvent::SearchDone { hits, status } => {
            assert!(hits.is_empty());
            assert!(status.contains("403"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    worker.shutdown();
}

#[test]
fn worker_reports_empty_search() {
    let worker = FetchWorker::spawn(FakeFetcher::default());
    worker
        .send(FetchCmd::Search {
            query: "x".into(),
            limit: 10,
        })
        .unwrap();
    match worker.recv().unwrap() {
        FetchEvent::SearchDone { hits, status } => {
            assert!(hits.is_empty());
            assert_eq!(status, "No results found.");
        }
        other => panic!("unexpected event: {other:?}"),
    }
    worker.shutdown();
}

#[test]
fn worker_download_success_and_failure() {
    let fake = FakeFetcher::default();
    let downloads = fake.downloads.clone();
    let worker = FetchWorker::spawn(fake);
    worker.send(FetchCmd::Download(hit("Good Song", "g1"))).unwrap();

    match worker.recv().unwrap() {
        FetchEvent::Downloaded { hit, outcome } => {
            assert_eq!(hit.remote_id, "g1");
            assert_eq!(
                outcome.local_path,
                Some(Path::new("music").join("GoodSong.mp3"))
            );
            assert!(outcome.status.contains("downloaded successfully"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    worker.shutdown();
    assert_eq!(*downloads.lock().unwrap(), vec!["g1".to_string()]);

    let failing = FetchWorker::spawn(FakeFetcher {
        fail_download: true,
        ..FakeFetcher::default()
    });
    failing.send(FetchCmd::Download(hit("Bad Song", "b1"))).unwrap();
    match failing.recv().unwrap() {
        FetchEvent::Downloaded { outcome, .. } => {
            assert_eq!(outcome.local_path, None);
            assert!(outcome.status.starts_with("Failed to download Bad Song."));
            assert!(outcome.status.contains("network unreachable"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    failing.shutdown();
}

#[test]
fn try_recv_does_not_block_when_idle() {
    let worker = FetchWorker::spawn(FakeFetcher::default());
    assert!(worker.try_recv().is_none());
    worker.shutdown();
}

#[test]
fn downloader_that_cannot_start_is_a_spawn_error() {
    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader {
        program: "definitely-not-a-real-downloader-binary",
        audio_quality: "192K",
        dir: dir.path(),
    };
    assert!(matches!(
        downloader.run("https://example.invalid/watch", "Song"),
        Err(FetchError::Spawn { .. })
    ));
}

#[cfg(unix)]
#[test]
fn downloader_exit_status_and_missing_output_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let music = dir.path().join("music");

    let failing = Downloader {
        program: "false",
        audio_quality: "192K",
        dir: &music,
    };
    assert!(matches!(
        failing.run("https://example.invalid/watch", "Song"),
        Err(FetchError::Download(_))
    ));
    assert!(music.is_dir());

    let silent = Downloader {
        program: "true",
        audio_quality: "192K",
        dir: &music,
    };
    match silent.run("https://example.invalid/watch", "Song") {
        Err(FetchError::Download(msg)) => assert!(msg.contains("no file was produced")),
        other => panic!("unexpected result: {other:?}"),
    }
}
