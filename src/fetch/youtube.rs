//! YouTube Data API search plus an external downloader for the audio.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::FetchSettings;
use crate::error::FetchError;

use super::download::{Downloader, file_stem_for};
use super::types::{SearchHit, TrackFetcher};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

pub struct YoutubeFetcher {
    client: Client,
    settings: FetchSettings,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: ItemId,
    snippet: Snippet,
}

#[derive(Deserialize)]
struct ItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
}

impl YoutubeFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client, settings })
    }
}

impl TrackFetcher for YoutubeFetcher {
    fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>, FetchError> {
        if self.settings.api_key.trim().is_empty() {
            return Err(FetchError::MissingApiKey);
        }

        let limit = limit.to_string();
        let response = self
            .client
            .get(&self.settings.api_base_url)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("maxResults", limit.as_str()),
                ("key", self.settings.api_key.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "search request rejected");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text()?;
        let hits = parse_search_response(&body)?;
        debug!(query, hits = hits.len(), "search finished");
        Ok(hits)
    }

    fn fetch_to_local(&self, remote_id: &str, title: &str) -> Result<PathBuf, FetchError> {
        let downloader = Downloader {
            program: &self.settings.downloader,
            audio_quality: &self.settings.audio_quality,
            dir: &self.settings.download_dir,
        };
        let url = format!("{WATCH_URL}{remote_id}");
        downloader.run(&url, &file_stem_for(remote_id, title))
    }
}

/// Parse a search response body. Items that are not videos are skipped.
pub(super) fn parse_search_response(body: &str) -> Result<Vec<SearchHit>, FetchError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .items
        .into_iter()
        .filter_map(|item| {
            let remote_id = item.id.video_id.filter(|id| !id.is_empty())?;
            Some(SearchHit {
                title: item.snippet.title,
                remote_id,
                channel: item.snippet.channel_title,
            })
        })
        .collect())
}
