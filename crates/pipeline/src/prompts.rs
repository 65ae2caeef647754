//! Prompt templates and the renderer that fills them.
//!
//! Templates use `{name}` placeholders. Rendering is a single left-to-right
//! pass: substituted values are never scanned again, and braces that do not
//! name a known placeholder (like the JSON example in `RECOMMEND_MOVIE`) are
//! copied through as-is.

use providers::Document;

use crate::types::{Enrichment, RecommendationRequest};

/// A fixed prompt with named placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    name: &'static str,
    text: &'static str,
}

/// Asks for the latest movie of a genre featuring an actor, as JSON.
///
/// Placeholders: `{genre}`, `{actor}`
pub const RECOMMEND_MOVIE: PromptTemplate = PromptTemplate::new(
    "recommend_prompt",
    r#"Tell me the name of latest {genre} movie which {actor} is one of the actors. Output the movie name in the form of a json e.g. {"movie_name": "movie name"}. Output only the json without any additional information or side notes."#,
);

/// Asks for a short summary of an encyclopedia article.
///
/// Placeholders: `{wiki_dump}`
pub const SUMMARIZE_PLOT: PromptTemplate = PromptTemplate::new(
    "plot_prompt",
    "Summarize the below movie description in a few sentences, only output the summary nothing else:

{wiki_dump}
",
);

/// Asks for the final recommendation paragraph.
///
/// Placeholders: `{movie}`, `{movie_plot}`, `{youtube_trailer}`
pub const FINAL_RESPONSE: PromptTemplate = PromptTemplate::new(
    "final_prompt",
    "Combine the results from movie name, movie plot description and youtube trailer link below into a well written movie recommendation:
{movie}
{movie_plot}
{youtube_trailer}
",
);

impl PromptTemplate {
    pub const fn new(name: &'static str, text: &'static str) -> Self {
        Self { name, text }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Substitute `vars` into the template.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let value = after.find('}').and_then(|close| {
                let key = &after[..close];
                vars.iter()
                    .find(|(name, _)| *name == key)
                    .map(|(_, value)| (*value, close))
            });
            match value {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Values that can fill a template.
pub trait PromptVars {
    fn vars(&self) -> Vec<(&'static str, &str)>;
}

impl PromptVars for RecommendationRequest {
    fn vars(&self) -> Vec<(&'static str, &str)> {
        vec![("genre", self.genre()), ("actor", self.actor())]
    }
}

impl PromptVars for Document {
    fn vars(&self) -> Vec<(&'static str, &str)> {
        vec![("wiki_dump", self.page_content.as_str())]
    }
}

impl PromptVars for Enrichment {
    fn vars(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("movie", self.title.as_str()),
            ("movie_plot", self.summary.as_str()),
            ("youtube_trailer", self.trailer.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<T: PromptVars>(template: PromptTemplate, values: &T) -> String {
        template.render(&values.vars())
    }

    #[test]
    fn test_recommend_prompt_embeds_genre_and_actor() {
        let cases = [
            ("action", "al pacino"),
            ("drama", "Brad Pitt"),
            ("sci-fi / horror", "Sigourney Weaver"),
            ("comédie", "Jean Dujardin"),
        ];
        for (genre, actor) in cases {
            let request = RecommendationRequest::new(genre, actor).unwrap();
            let prompt = render(RECOMMEND_MOVIE, &request);
            assert!(prompt.contains(genre), "{prompt}");
            assert!(prompt.contains(actor), "{prompt}");
        }
    }

    #[test]
    fn test_recommend_prompt_keeps_json_example() {
        let request = RecommendationRequest::new("drama", "Brad Pitt").unwrap();
        let prompt = render(RECOMMEND_MOVIE, &request);
        assert!(prompt.contains(r#"{"movie_name": "movie name"}"#));
        assert!(prompt.starts_with("Tell me the name of latest drama movie which Brad Pitt"));
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let request = RecommendationRequest::new("{actor}", "Keanu Reeves").unwrap();
        let prompt = render(RECOMMEND_MOVIE, &request);
        assert!(prompt.contains("latest {actor} movie which Keanu Reeves"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let request = RecommendationRequest::new("action", "al pacino").unwrap();
        assert_eq!(render(RECOMMEND_MOVIE, &request), render(RECOMMEND_MOVIE, &request));
    }

    #[test]
    fn test_unknown_and_unclosed_placeholders_pass_through() {
        let template = PromptTemplate::new("t", "a {missing} b {known} c {open");
        assert_eq!(template.render(&[("known", "K")]), "a {missing} b K c {open");
    }

    #[test]
    fn test_final_prompt_carries_all_parts() {
        let enrichment = Enrichment {
            title: "Heat".to_string(),
            summary: "Cops and robbers in LA.".to_string(),
            trailer: "https://www.youtube.com/watch?v=abc".to_string(),
        };
        let prompt = render(FINAL_RESPONSE, &enrichment);
        assert!(prompt.contains("Heat\nCops and robbers in LA.\nhttps://www.youtube.com/watch?v=abc"));
    }
}
