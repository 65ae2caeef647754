//! Request-scoped values passed between stages.

use crate::error::{PipelineError, Result};

pub type MovieTitle = String;
pub type Summary = String;
pub type TrailerReference = String;

/// What the caller asks for.
///
/// Fields are private so the non-empty invariant holds for every instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRequest {
    genre: String,
    actor: String,
}

impl RecommendationRequest {
    /// Build a request; both fields must contain something besides whitespace.
    pub fn new(genre: impl Into<String>, actor: impl Into<String>) -> Result<Self> {
        let genre = genre.into();
        let actor = actor.into();
        if genre.trim().is_empty() {
            return Err(PipelineError::InvalidRequest("genre must not be empty".into()));
        }
        if actor.trim().is_empty() {
            return Err(PipelineError::InvalidRequest("actor must not be empty".into()));
        }
        Ok(Self { genre, actor })
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }
}

/// Output of the enrichment fan-out, input of synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub title: MovieTitle,
    pub summary: Summary,
    pub trailer: TrailerReference,
}

/// Final result handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub title: MovieTitle,
    pub summary: Summary,
    pub trailer: TrailerReference,
    /// The synthesis reply, verbatim.
    pub text: String,
}

impl Recommendation {
    pub fn new(enrichment: Enrichment, text: String) -> Self {
        Self {
            title: enrichment.title,
            summary: enrichment.summary,
            trailer: enrichment.trailer,
            text,
        }
    }
}
