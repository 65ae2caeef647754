//! Clients for the external services the recommendation chain talks to.
//!
//! This crate provides:
//! - `LanguageModel`, `Encyclopedia` and `VideoSearch` traits, the seams the
//!   pipeline depends on
//! - `ChatModelClient` for an OpenAI-compatible chat completion endpoint
//! - `WikipediaRetriever` for the MediaWiki search + extracts API
//! - `YoutubeSearch` (results page scraping) and `CommandVideoSearch`
//!   (external tool printing a list of links)
//!
//! Clients are built once and shared behind `Arc<dyn ...>` handles, so tests
//! can substitute fakes for any of them.

pub mod chat;
pub mod command;
pub mod error;
pub mod wikipedia;
pub mod youtube;

use async_trait::async_trait;
use std::fmt::Debug;

pub use chat::{ChatModelClient, ChatModelSettings};
pub use command::CommandVideoSearch;
pub use error::{ProviderError, Result};
pub use wikipedia::{WikipediaRetriever, WikipediaSettings};
pub use youtube::{YoutubeSearch, YoutubeSettings};

/// A hosted language model that turns a prompt into a text completion.
#[async_trait]
pub trait LanguageModel: Send + Sync + Debug {
    /// Send a single user prompt and return the completion text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// An encyclopedia lookup service.
#[async_trait]
pub trait Encyclopedia: Send + Sync + Debug {
    /// Returns documents ordered by relevance; may be empty.
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>>;
}

/// A keyword search over a video index.
#[async_trait]
pub trait VideoSearch: Send + Sync + Debug {
    async fn search(&self, query: &str) -> Result<VideoResults>;
}

/// One encyclopedia article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub page_content: String,
    pub source: String,
}

/// One video found by a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoHit {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// What a video search hands back.
///
/// Structured hits are preferred. `Display` carries the raw printed output of
/// tools that only emit a formatted list of links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoResults {
    Hits(Vec<VideoHit>),
    Display(String),
}
