//! YouTube video search.
//!
//! There is no keyless search API, so this scrapes the public results page:
//! the page embeds its initial state as a `ytInitialData` JSON object, and
//! every search hit is a `videoRenderer` entry inside it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde_json::Value;
use tracing::debug;

use crate::error::{check_status, ProviderError, Result};
use crate::{VideoHit, VideoResults, VideoSearch};

const INITIAL_DATA_MARKER: &str = "ytInitialData";
const SECTIONS_POINTER: &str =
    "/contents/twoColumnSearchResultsRenderer/primaryContents/sectionListRenderer/contents";

/// Options for `YoutubeSearch`.
#[derive(Debug, Clone)]
pub struct YoutubeSettings {
    /// Site root, e.g. `https://www.youtube.com`.
    pub base_url: String,
    pub max_results: usize,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct YoutubeSearch {
    client: ReqwestClient,
    settings: YoutubeSettings,
}

impl YoutubeSearch {
    pub fn new(settings: YoutubeSettings) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(ProviderError::ClientBuild)?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl VideoSearch for YoutubeSearch {
    async fn search(&self, query: &str) -> Result<VideoResults> {
        let base = self.settings.base_url.trim_end_matches('/');
        let response = self
            .client
            .get(format!("{base}/results"))
            .query(&[("search_query", query)])
            .send()
            .await?;
        let page = check_status(response).await?.text().await?;

        let mut hits = parse_results_page(&page, base)?;
        hits.truncate(self.settings.max_results);
        debug!("YouTube search for {:?} returned {} hits", query, hits.len());
        Ok(VideoResults::Hits(hits))
    }
}

/// Extract the video hits, in page order, from a results page.
pub fn parse_results_page(page: &str, base_url: &str) -> Result<Vec<VideoHit>> {
    let data = initial_data(page)?;
    let sections = data
        .pointer(SECTIONS_POINTER)
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::InvalidResponse("results page has no result sections".into()))?;

    let hits = sections
        .iter()
        .filter_map(|section| section.pointer("/itemSectionRenderer/contents"))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|item| item.get("videoRenderer"))
        .filter_map(|renderer| video_hit(renderer, base_url))
        .collect();
    Ok(hits)
}

fn initial_data(page: &str) -> Result<Value> {
    let marker = page
        .find(INITIAL_DATA_MARKER)
        .ok_or_else(|| ProviderError::InvalidResponse("results page has no ytInitialData".into()))?;
    let rest = &page[marker + INITIAL_DATA_MARKER.len()..];
    let open = rest
        .find('{')
        .ok_or_else(|| ProviderError::InvalidResponse("ytInitialData is not an object".into()))?;

    // Only the first value matters; the script tag continues after it.
    serde_json::Deserializer::from_str(&rest[open..])
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("ytInitialData is empty".into()))?
        .map_err(|e| ProviderError::InvalidResponse(format!("ytInitialData: {e}")))
}

fn video_hit(renderer: &Value, base_url: &str) -> Option<VideoHit> {
    let id = renderer.get("videoId")?.as_str()?.to_string();
    let title = renderer
        .pointer("/title/runs/0/text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let url = match renderer
        .pointer("/navigationEndpoint/commandMetadata/webCommandMetadata/url")
        .and_then(Value::as_str)
    {
        Some(suffix) => format!("{base_url}{suffix}"),
        None => format!("{base_url}/watch?v={id}"),
    };
    Some(VideoHit { id, title, url })
}
