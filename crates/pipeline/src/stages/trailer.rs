//! Trailer lookup for the resolved title.

use std::sync::Arc;

use async_trait::async_trait;
use providers::{VideoResults, VideoSearch};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::traits::Stage;
use crate::types::{MovieTitle, TrailerReference};

/// Query sent to the video search for a title.
pub fn trailer_query(title: &str) -> String {
    format!("{title} movie trailer")
}

/// Pick the first reference out of a search result.
pub fn first_reference(results: VideoResults, query: &str) -> Result<TrailerReference> {
    match results {
        VideoResults::Hits(hits) => hits
            .into_iter()
            .next()
            .map(|hit| hit.url)
            .ok_or_else(|| PipelineError::EmptyResult {
                query: query.to_string(),
            }),
        VideoResults::Display(output) => quoted_reference(&output),
    }
}

/// First non-empty single-quoted field of a printed result list.
///
/// `"['https://www.youtube.com/watch?v=a', ...]"` yields the first link,
/// `"abc'videoID123'def"` yields `videoID123`.
pub fn quoted_reference(output: &str) -> Result<TrailerReference> {
    let parts: Vec<&str> = output.split('\'').collect();
    // Odd parts sit between quotes; the last part is never closed.
    parts
        .iter()
        .take(parts.len().saturating_sub(1))
        .skip(1)
        .step_by(2)
        .find(|field| !field.is_empty())
        .map(|field| field.to_string())
        .ok_or_else(|| PipelineError::FormatMismatch {
            output: output.to_string(),
        })
}

/// Finds a trailer for a movie title.
pub struct FindTrailer {
    search: Arc<dyn VideoSearch>,
}

impl FindTrailer {
    pub fn new(search: Arc<dyn VideoSearch>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Stage for FindTrailer {
    type Input = MovieTitle;
    type Output = TrailerReference;

    fn name(&self) -> &str {
        "find_trailer"
    }

    async fn run(&self, title: MovieTitle) -> Result<TrailerReference> {
        let query = trailer_query(&title);
        let results = self
            .search
            .search(&query)
            .await
            .map_err(|e| PipelineError::provider(self.name(), e))?;
        let reference = first_reference(results, &query)?;
        debug!("Trailer for {:?}: {}", title, reference);
        Ok(reference)
    }
}
