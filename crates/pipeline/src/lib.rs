//! Stages and combinators for the movie recommendation chain.
//!
//! This crate provides:
//! - `Stage` trait and the `Chain` / `FanOut` combinators
//! - prompt templates and the single-pass renderer
//! - the concrete stages (render, model call, title extraction, article
//!   retrieval, trailer lookup)
//! - `PipelineError`, the classified failures of the chain
//!
//! ## Architecture
//! Data flows strictly forward:
//! 1. the request is rendered into a prompt and the model names a movie
//! 2. the title fans out to an article summary and a trailer lookup
//! 3. title, summary and trailer are merged into a final prompt
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::prompts::RECOMMEND_MOVIE;
//! use pipeline::stages::*;
//! use pipeline::StageExt;
//!
//! let resolver = RenderPrompt::<RecommendationRequest>::new(RECOMMEND_MOVIE)
//!     .then(InvokeModel::new("ask_title", model.clone()))
//!     .then(ExtractMovieName);
//!
//! let title = resolver.run(RecommendationRequest::new("action", "al pacino")?).await?;
//! ```

pub mod chain;
pub mod error;
pub mod prompts;
pub mod stages;
pub mod traits;
pub mod types;

// Re-export main types
pub use chain::{Chain, FanOut};
pub use error::{PipelineError, Result};
pub use traits::{BoxStage, Stage, StageExt};
pub use types::{
    Enrichment, MovieTitle, Recommendation, RecommendationRequest, Summary, TrailerReference,
};
