//! Wikipedia retrieval over the MediaWiki action API.
//!
//! A query runs a full-text search first, then loads the plain-text extract of
//! each of the top titles. Titles whose page has no extract (missing pages,
//! some disambiguation pages) are skipped, like a reader would skip a dead
//! link.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::debug;

use crate::error::{check_status, ProviderError, Result};
use crate::{Document, Encyclopedia};

/// MediaWiki caps search strings; longer ones come back as an API error.
const MAX_QUERY_CHARS: usize = 300;

/// `{"error": {"code": ..., "info": ...}}`, sent with HTTP 200.
#[derive(Deserialize, Debug)]
struct ApiError {
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Deserialize, Debug)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize, Debug)]
struct SearchHit {
    title: String,
}

#[derive(Deserialize, Debug)]
struct ExtractResponse {
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    query: Option<ExtractQuery>,
}

#[derive(Deserialize, Debug)]
struct ExtractQuery {
    #[serde(default)]
    pages: Vec<ExtractPage>,
}

#[derive(Deserialize, Debug)]
struct ExtractPage {
    title: String,
    #[serde(default)]
    extract: Option<String>,
}

/// Options for `WikipediaRetriever`.
#[derive(Debug, Clone)]
pub struct WikipediaSettings {
    /// Site root, e.g. `https://en.wikipedia.org`.
    pub base_url: String,
    /// Number of search results to load.
    pub top_k_results: usize,
    /// Page content is cut to this many characters.
    pub max_chars: usize,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct WikipediaRetriever {
    client: ReqwestClient,
    settings: WikipediaSettings,
}

impl WikipediaRetriever {
    pub fn new(settings: WikipediaSettings) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("movie-chain/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ProviderError::ClientBuild)?;
        Ok(Self { client, settings })
    }

    fn api_url(&self) -> String {
        format!("{}/w/api.php", self.settings.base_url.trim_end_matches('/'))
    }

    async fn search_titles(&self, query: &str) -> Result<Vec<String>> {
        let query = truncate_chars(query, MAX_QUERY_CHARS);
        let limit = self.settings.top_k_results.to_string();
        let response = self
            .client
            .get(self.api_url())
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query.as_str()),
                ("srlimit", limit.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?;
        let parsed: SearchResponse = check_status(response).await?.json().await?;
        let query = answer(parsed.error, parsed.query)?;
        Ok(query.search.into_iter().map(|hit| hit.title).collect())
    }

    async fn load_page(&self, title: &str) -> Result<Option<Document>> {
        let response = self
            .client
            .get(self.api_url())
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("formatversion", "2"),
                ("format", "json"),
                ("titles", title),
            ])
            .send()
            .await?;
        let parsed: ExtractResponse = check_status(response).await?.json().await?;

        let query = answer(parsed.error, parsed.query)?;

        let page = match query.pages.into_iter().next() {
            Some(page) => page,
            None => return Ok(None),
        };
        let content = match page.extract {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                debug!("Skipping page without extract: {}", page.title);
                return Ok(None);
            }
        };

        Ok(Some(Document {
            source: format!(
                "{}/wiki/{}",
                self.settings.base_url.trim_end_matches('/'),
                page.title.replace(' ', "_")
            ),
            page_content: truncate_chars(&content, self.settings.max_chars),
            title: page.title,
        }))
    }
}

#[async_trait]
impl Encyclopedia for WikipediaRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>> {
        let titles = self.search_titles(query).await?;
        debug!("Wikipedia search for {:?} returned {} titles", query, titles.len());

        let pages = try_join_all(titles.iter().map(|title| self.load_page(title))).await?;
        Ok(pages.into_iter().flatten().collect())
    }
}

/// The `query` payload, or the API error the service sent in its place.
fn answer<T>(error: Option<ApiError>, query: Option<T>) -> Result<T> {
    if let Some(error) = error {
        return Err(ProviderError::InvalidResponse(format!(
            "MediaWiki error {}: {}",
            error.code, error.info
        )));
    }
    query.ok_or_else(|| ProviderError::InvalidResponse("MediaWiki reply has no query".into()))
}

/// Cut `text` to at most `max` characters without splitting a code point.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
