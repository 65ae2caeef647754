//! Stage implementations for the recommendation chain.
//!
//! Each stage is small; the pipeline is built by composing them:
//! - resolver: `RenderPrompt` → `InvokeModel` → `ExtractMovieName`
//! - movie plot: `RetrieveArticle` → `RenderPrompt` → `InvokeModel`
//! - trailer: `FindTrailer`
//! - synthesis: `RenderPrompt` → `InvokeModel`

pub mod extract;
pub mod model;
pub mod render;
pub mod retrieve;
pub mod trailer;

// Re-export for convenience
pub use extract::{ExtractMovieName, extract_movie_name};
pub use model::InvokeModel;
pub use render::RenderPrompt;
pub use retrieve::{RetrieveArticle, article_query};
pub use trailer::{FindTrailer, first_reference, quoted_reference, trailer_query};
