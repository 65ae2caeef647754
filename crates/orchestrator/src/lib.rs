//! Orchestrator crate for the movie-chain recommender.
//!
//! This crate wires the pipeline stages to real or injected collaborators
//! and owns the configuration layer.

pub mod config;
pub mod graph;
pub mod orchestrator;

pub use config::{ChainConfig, ConfigError, ModelOverrides, VideoBackend};
pub use orchestrator::RecommendationOrchestrator;
