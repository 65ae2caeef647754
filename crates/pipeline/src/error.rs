//! Error types for the recommendation pipeline.
//!
//! Every failure is classified; nothing is recovered locally. The caller
//! gets either a full recommendation or one of these.

use providers::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Genre or actor was empty
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The model reply did not carry a usable `movie_name`
    #[error("Malformed model reply ({reason}): {reply:?}")]
    MalformedReply { reply: String, reason: String },

    /// A lookup came back with nothing to work with
    #[error("No results for query {query:?}")]
    EmptyResult { query: String },

    /// A search tool printed something without a quoted reference in it
    #[error("Unexpected search tool output, no quoted reference in {output:?}")]
    FormatMismatch { output: String },

    /// An external service call failed
    #[error("Stage {stage} failed: {source}")]
    Provider {
        stage: String,
        #[source]
        source: ProviderError,
    },
}

impl PipelineError {
    /// Tag a provider failure with the stage it happened in.
    pub fn provider(stage: &str, source: ProviderError) -> Self {
        PipelineError::Provider {
            stage: stage.to_string(),
            source,
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, PipelineError>;
