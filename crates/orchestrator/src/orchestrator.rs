//! # Recommendation Orchestrator
//!
//! This module wires the stages into the full chain and runs it:
//! 1. Resolve a movie title from genre and actor
//! 2. Enrich the title (article summary + trailer, in parallel)
//! 3. Synthesize the final recommendation
//!
//! Collaborators are injected as trait objects, so tests run the whole
//! chain against fakes and the binary against the real services.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use pipeline::prompts::{FINAL_RESPONSE, RECOMMEND_MOVIE, SUMMARIZE_PLOT};
use pipeline::stages::{
    ExtractMovieName, FindTrailer, InvokeModel, RenderPrompt, RetrieveArticle,
};
use pipeline::{
    BoxStage, Enrichment, FanOut, MovieTitle, Recommendation, RecommendationRequest, StageExt,
};
use providers::{
    ChatModelClient, CommandVideoSearch, Encyclopedia, LanguageModel, VideoSearch,
    WikipediaRetriever, YoutubeSearch,
};

use crate::config::{ChainConfig, VideoBackend};
use crate::graph;

/// Runs the recommendation chain end to end.
pub struct RecommendationOrchestrator {
    resolver: BoxStage<RecommendationRequest, MovieTitle>,
    enrichment: BoxStage<MovieTitle, Enrichment>,
    synthesis: BoxStage<Enrichment, String>,
}

impl RecommendationOrchestrator {
    /// Build the chain around already constructed clients.
    pub fn new(
        model: Arc<dyn LanguageModel>,
        encyclopedia: Arc<dyn Encyclopedia>,
        video: Arc<dyn VideoSearch>,
    ) -> Self {
        let resolver = RenderPrompt::<RecommendationRequest>::new(RECOMMEND_MOVIE)
            .then(InvokeModel::new("ask_title", model.clone()))
            .then(ExtractMovieName)
            .boxed();

        let movie_plot = RetrieveArticle::new(encyclopedia)
            .then(RenderPrompt::new(SUMMARIZE_PLOT))
            .then(InvokeModel::new("summarize_plot", model.clone()));
        let enrichment = FanOut::new(
            "enrich",
            movie_plot,
            FindTrailer::new(video),
            |title, summary, trailer| Enrichment {
                title,
                summary,
                trailer,
            },
        )
        .boxed();

        let synthesis = RenderPrompt::<Enrichment>::new(FINAL_RESPONSE)
            .then(InvokeModel::new("write_recommendation", model))
            .boxed();

        Self {
            resolver,
            enrichment,
            synthesis,
        }
    }

    /// Build the real clients described by `config`.
    pub fn from_config(config: &ChainConfig) -> Result<Self> {
        config.validate()?;

        let model = ChatModelClient::new(config.chat_settings())
            .context("Creating language model client")?;
        info!("Using language model at {}", model.api_url());

        let encyclopedia = WikipediaRetriever::new(config.wikipedia_settings())
            .context("Creating Wikipedia client")?;

        let video: Arc<dyn VideoSearch> = match config.video.backend {
            VideoBackend::Youtube => Arc::new(
                YoutubeSearch::new(config.youtube_settings())
                    .context("Creating YouTube client")?,
            ),
            VideoBackend::Command => {
                let (program, args) = config
                    .video
                    .command
                    .split_first()
                    .context("Video search command is empty")?;
                Arc::new(CommandVideoSearch::new(program.clone(), args.to_vec()))
            }
        };

        Ok(Self::new(Arc::new(model), Arc::new(encyclopedia), video))
    }

    /// Main entry point: one recommendation for a genre and an actor.
    ///
    /// Any failure aborts the chain; no partial recommendation is returned.
    pub async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> pipeline::Result<Recommendation> {
        let start_time = Instant::now();
        info!(
            "Recommending a {} movie with {}",
            request.genre(),
            request.actor()
        );

        let title = self.resolve(request).await?;
        let enrichment = self.enrich(title).await?;
        let text = self.synthesize(enrichment.clone()).await?;

        info!(
            "Total time to recommend {:?}: {:.2?}",
            enrichment.title,
            start_time.elapsed()
        );
        Ok(Recommendation::new(enrichment, text))
    }

    async fn resolve(&self, request: RecommendationRequest) -> pipeline::Result<MovieTitle> {
        let start = Instant::now();
        let title = self.resolver.run(request).await?;
        info!("Resolved title {:?} in {:.2?}", title, start.elapsed());
        Ok(title)
    }

    async fn enrich(&self, title: MovieTitle) -> pipeline::Result<Enrichment> {
        let start = Instant::now();
        let enrichment = self.enrichment.run(title).await?;
        info!(
            "Enriched {:?} (summary: {} chars, trailer: {}) in {:.2?}",
            enrichment.title,
            enrichment.summary.len(),
            enrichment.trailer,
            start.elapsed()
        );
        Ok(enrichment)
    }

    async fn synthesize(&self, enrichment: Enrichment) -> pipeline::Result<String> {
        let start = Instant::now();
        let text = self.synthesis.run(enrichment).await?;
        info!("Synthesized recommendation in {:.2?}", start.elapsed());
        Ok(text)
    }

    /// Stage rows, top to bottom.
    pub fn layers(&self) -> Vec<Vec<String>> {
        let mut layers = self.resolver.layers();
        layers.extend(self.enrichment.layers());
        layers.extend(self.synthesis.layers());
        layers
    }

    /// The chain drawn as ASCII boxes.
    pub fn graph(&self) -> String {
        graph::render(&self.layers())
    }
}
