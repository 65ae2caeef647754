//! Reads the movie title out of the resolver's JSON reply.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::error::{PipelineError, Result};
use crate::traits::Stage;
use crate::types::MovieTitle;

#[derive(Deserialize)]
struct MovieNameReply {
    movie_name: String,
}

/// Parse `{"movie_name": "..."}` from a model reply.
///
/// The reply is parsed strictly first. If that fails but the reply contains a
/// `{...}` object (the model added prose or a code fence around it), that
/// object is parsed instead. Anything else is a `MalformedReply`; no
/// default title is ever substituted.
pub fn extract_movie_name(reply: &str) -> Result<MovieTitle> {
    let parsed = match serde_json::from_str::<MovieNameReply>(reply.trim()) {
        Ok(parsed) => parsed,
        Err(strict_err) => {
            match embedded_reply(reply) {
                Some(parsed) => {
                    warn!("Model reply had text around the JSON object, using the embedded object");
                    parsed
                }
                None => {
                    return Err(PipelineError::MalformedReply {
                        reply: reply.to_string(),
                        reason: strict_err.to_string(),
                    });
                }
            }
        }
    };

    if parsed.movie_name.trim().is_empty() {
        return Err(PipelineError::MalformedReply {
            reply: reply.to_string(),
            reason: "movie_name is empty".to_string(),
        });
    }
    Ok(parsed.movie_name)
}

/// The first `{...}` object in `text` that reads as a reply.
///
/// Each candidate is parsed as a stream, so text after the object (braces
/// included) is never looked at.
fn embedded_reply(text: &str) -> Option<MovieNameReply> {
    text.match_indices('{').find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<MovieNameReply>()
            .next()?
            .ok()
    })
}

/// Stage wrapper around `extract_movie_name`.
pub struct ExtractMovieName;

#[async_trait]
impl Stage for ExtractMovieName {
    type Input = String;
    type Output = MovieTitle;

    fn name(&self) -> &str {
        "extract_movie"
    }

    async fn run(&self, reply: String) -> Result<MovieTitle> {
        extract_movie_name(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_exact_title() {
        assert_eq!(extract_movie_name(r#"{"movie_name": "Heat"}"#).unwrap(), "Heat");
    }

    #[test]
    fn test_title_is_not_trimmed_or_rewritten() {
        let title = extract_movie_name(r#"{"movie_name": "The Irishman ", "year": 2019}"#).unwrap();
        assert_eq!(title, "The Irishman ");
    }

    #[test]
    fn test_non_json_reply_is_malformed() {
        match extract_movie_name("I don't know") {
            Err(PipelineError::MalformedReply { reply, .. }) => assert_eq!(reply, "I don't know"),
            other => panic!("Expected MalformedReply, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_key_is_malformed() {
        let result = extract_movie_name(r#"{"title": "Heat"}"#);
        assert!(matches!(result, Err(PipelineError::MalformedReply { .. })));
    }

    #[test]
    fn test_non_string_value_is_malformed() {
        let result = extract_movie_name(r#"{"movie_name": 42}"#);
        assert!(matches!(result, Err(PipelineError::MalformedReply { .. })));
    }

    #[test]
    fn test_empty_title_is_malformed() {
        let result = extract_movie_name(r#"{"movie_name": "  "}"#);
        assert!(matches!(result, Err(PipelineError::MalformedReply { .. })));
    }

    #[test]
    fn test_json_wrapped_in_prose_or_fence() {
        let prose = r#"Sure! Here it is: {"movie_name": "The Irishman"} Enjoy."#;
        assert_eq!(extract_movie_name(prose).unwrap(), "The Irishman");

        let fenced = "```json\n{\"movie_name\": \"Heat\"}\n```";
        assert_eq!(extract_movie_name(fenced).unwrap(), "Heat");
    }

    #[test]
    fn test_braces_in_surrounding_prose() {
        let trailing = r#"{"movie_name": "Heat"} (I picked {the} newest one)"#;
        assert_eq!(extract_movie_name(trailing).unwrap(), "Heat");

        let leading = r#"Format {json}: {"movie_name": "Heat"} done {}"#;
        assert_eq!(extract_movie_name(leading).unwrap(), "Heat");
    }

    #[test]
    fn test_surrounding_whitespace_is_accepted() {
        assert_eq!(extract_movie_name("\n  {\"movie_name\": \"Heat\"}\n").unwrap(), "Heat");
    }
}
