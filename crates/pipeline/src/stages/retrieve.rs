//! Encyclopedia lookup for the resolved title.

use std::sync::Arc;

use async_trait::async_trait;
use providers::{Document, Encyclopedia};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::traits::Stage;
use crate::types::MovieTitle;

/// Query sent to the encyclopedia for a title.
pub fn article_query(title: &str) -> String {
    format!("hollywood english movie: {title}")
}

/// Fetches the leading article for a movie title.
///
/// Zero documents is an `EmptyResult` error: the chain fails fast rather
/// than summarizing nothing.
pub struct RetrieveArticle {
    encyclopedia: Arc<dyn Encyclopedia>,
}

impl RetrieveArticle {
    pub fn new(encyclopedia: Arc<dyn Encyclopedia>) -> Self {
        Self { encyclopedia }
    }
}

#[async_trait]
impl Stage for RetrieveArticle {
    type Input = MovieTitle;
    type Output = Document;

    fn name(&self) -> &str {
        "retrieve_article"
    }

    async fn run(&self, title: MovieTitle) -> Result<Document> {
        let query = article_query(&title);
        let documents = self
            .encyclopedia
            .retrieve(&query)
            .await
            .map_err(|e| PipelineError::provider(self.name(), e))?;
        debug!("Encyclopedia returned {} documents for {:?}", documents.len(), query);

        documents
            .into_iter()
            .next()
            .ok_or(PipelineError::EmptyResult { query })
    }
}
