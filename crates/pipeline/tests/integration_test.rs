//! Integration tests for the pipeline.
//!
//! These tests compose the real stages the way the orchestrator does and run
//! them against in-memory collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pipeline::prompts::{FINAL_RESPONSE, RECOMMEND_MOVIE, SUMMARIZE_PLOT};
use pipeline::stages::*;
use pipeline::{Enrichment, FanOut, PipelineError, RecommendationRequest, Stage, StageExt};
use providers::{
    Document, Encyclopedia, LanguageModel, ProviderError, VideoHit, VideoResults, VideoSearch,
};

/// Replies with a fixed answer and remembers every prompt it saw.
#[derive(Debug)]
struct RecordingModel {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingModel {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for RecordingModel {
    async fn complete(&self, prompt: &str) -> providers::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

#[derive(Debug)]
struct DownModel;

#[async_trait]
impl LanguageModel for DownModel {
    async fn complete(&self, _prompt: &str) -> providers::Result<String> {
        Err(ProviderError::Api {
            status: 503,
            body: "endpoint scaling up".to_string(),
        })
    }
}

#[derive(Debug)]
struct StaticEncyclopedia {
    documents: Vec<Document>,
    queries: Mutex<Vec<String>>,
}

impl StaticEncyclopedia {
    fn new(contents: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            documents: contents
                .iter()
                .map(|content| Document {
                    title: "Heat (1995 film)".to_string(),
                    page_content: content.to_string(),
                    source: "https://en.wikipedia.org/wiki/Heat_(1995_film)".to_string(),
                })
                .collect(),
            queries: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Encyclopedia for StaticEncyclopedia {
    async fn retrieve(&self, query: &str) -> providers::Result<Vec<Document>> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.documents.clone())
    }
}

#[derive(Debug)]
struct StaticVideos(VideoResults);

#[async_trait]
impl VideoSearch for StaticVideos {
    async fn search(&self, _query: &str) -> providers::Result<VideoResults> {
        Ok(self.0.clone())
    }
}

#[tokio::test]
async fn test_resolver_chain_returns_title() {
    let model = RecordingModel::new(r#"{"movie_name": "Heat"}"#);
    let resolver = RenderPrompt::<RecommendationRequest>::new(RECOMMEND_MOVIE)
        .then(InvokeModel::new("ask_title", model.clone()))
        .then(ExtractMovieName);

    let request = RecommendationRequest::new("action", "al pacino").unwrap();
    let title = resolver.run(request).await.unwrap();

    assert_eq!(title, "Heat");
    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("action") && prompts[0].contains("al pacino"));
}

#[tokio::test]
async fn test_resolver_chain_aborts_on_malformed_reply() {
    let model = RecordingModel::new("I don't know");
    let resolver = RenderPrompt::<RecommendationRequest>::new(RECOMMEND_MOVIE)
        .then(InvokeModel::new("ask_title", model))
        .then(ExtractMovieName);

    let request = RecommendationRequest::new("action", "al pacino").unwrap();
    let result = resolver.run(request).await;

    assert!(matches!(result, Err(PipelineError::MalformedReply { .. })));
}

#[tokio::test]
async fn test_provider_failure_names_the_stage() {
    let resolver = RenderPrompt::<RecommendationRequest>::new(RECOMMEND_MOVIE)
        .then(InvokeModel::new("ask_title", Arc::new(DownModel)))
        .then(ExtractMovieName);

    let request = RecommendationRequest::new("action", "al pacino").unwrap();
    let err = resolver.run(request).await.unwrap_err();

    match &err {
        PipelineError::Provider { stage, source } => {
            assert_eq!(stage, "ask_title");
            assert!(matches!(source, ProviderError::Api { status: 503, .. }));
        }
        other => panic!("Expected Provider error, got {other:?}"),
    }
    assert!(err.to_string().contains("ask_title"));
}

#[tokio::test]
async fn test_plot_chain_summarizes_first_document() {
    let model = RecordingModel::new("A heist crew is hunted by a detective.");
    let encyclopedia = StaticEncyclopedia::new(&["Heat is a 1995 crime film.", "Other article."]);
    let plot = RetrieveArticle::new(encyclopedia.clone())
        .then(RenderPrompt::new(SUMMARIZE_PLOT))
        .then(InvokeModel::new("summarize_plot", model.clone()));

    let summary = plot.run("Heat".to_string()).await.unwrap();

    assert_eq!(summary, "A heist crew is hunted by a detective.");
    assert_eq!(
        encyclopedia.queries.lock().unwrap().as_slice(),
        ["hollywood english movie: Heat".to_string()]
    );
    let prompts = model.prompts();
    assert!(prompts[0].contains("Heat is a 1995 crime film."));
    assert!(!prompts[0].contains("Other article."));
}

#[tokio::test]
async fn test_plot_chain_with_no_documents_is_empty_result() {
    let model = RecordingModel::new("unused");
    let plot = RetrieveArticle::new(StaticEncyclopedia::new(&[]))
        .then(RenderPrompt::new(SUMMARIZE_PLOT))
        .then(InvokeModel::new("summarize_plot", model.clone()));

    let result = plot.run("Heat".to_string()).await;

    match result {
        Err(PipelineError::EmptyResult { query }) => {
            assert_eq!(query, "hollywood english movie: Heat")
        }
        other => panic!("Expected EmptyResult, got {other:?}"),
    }
    assert!(model.prompts().is_empty(), "Summarizer must not be called");
}

#[tokio::test]
async fn test_trailer_from_display_output() {
    let trailer = FindTrailer::new(Arc::new(StaticVideos(VideoResults::Display(
        "abc'videoID123'def".to_string(),
    ))));
    assert_eq!(trailer.run("Heat".to_string()).await.unwrap(), "videoID123");

    let broken = FindTrailer::new(Arc::new(StaticVideos(VideoResults::Display(
        "[]".to_string(),
    ))));
    assert!(matches!(
        broken.run("Heat".to_string()).await,
        Err(PipelineError::FormatMismatch { .. })
    ));
}

#[tokio::test]
async fn test_enrichment_and_synthesis() {
    let summarizer = RecordingModel::new("Cops and robbers in LA.");
    let plot = RetrieveArticle::new(StaticEncyclopedia::new(&["Heat is a 1995 crime film."]))
        .then(RenderPrompt::new(SUMMARIZE_PLOT))
        .then(InvokeModel::new("summarize_plot", summarizer));
    let trailer = FindTrailer::new(Arc::new(StaticVideos(VideoResults::Hits(vec![VideoHit {
        id: "abc".to_string(),
        title: "Heat trailer".to_string(),
        url: "https://www.youtube.com/watch?v=abc".to_string(),
    }]))));
    let enrich = FanOut::new("enrich", plot, trailer, |title, summary, trailer| Enrichment {
        title,
        summary,
        trailer,
    });

    let writer = RecordingModel::new("You should watch Heat.");
    let synthesis = RenderPrompt::<Enrichment>::new(FINAL_RESPONSE)
        .then(InvokeModel::new("write_recommendation", writer.clone()));

    let enrichment = enrich.run("Heat".to_string()).await.unwrap();
    assert_eq!(enrichment.summary, "Cops and robbers in LA.");
    assert_eq!(enrichment.trailer, "https://www.youtube.com/watch?v=abc");

    let text = synthesis.run(enrichment).await.unwrap();
    assert_eq!(text, "You should watch Heat.");
    let prompt = &writer.prompts()[0];
    assert!(prompt.contains("Heat"));
    assert!(prompt.contains("Cops and robbers in LA."));
    assert!(prompt.contains("https://www.youtube.com/watch?v=abc"));
}
