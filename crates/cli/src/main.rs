use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use orchestrator::config::{HOST_ENV, TOKEN_ENV};
use orchestrator::{ChainConfig, ModelOverrides, RecommendationOrchestrator};
use pipeline::{Recommendation, RecommendationRequest};
use std::path::PathBuf;
use std::time::Instant;

/// movie-chain - LLM movie recommendations with plot and trailer
#[derive(Parser)]
#[command(name = "movie-chain")]
#[command(about = "Recommend a movie for a genre and an actor", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Model serving host (workspace URL)
    #[arg(long, env = HOST_ENV, global = true)]
    host: Option<String>,

    /// Bearer token for the model host
    #[arg(long, env = TOKEN_ENV, global = true, hide_env_values = true)]
    token: Option<String>,

    /// Serving endpoint name
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Generation cap per model call
    #[arg(long, global = true)]
    max_tokens: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get a movie recommendation
    Recommend {
        /// Genre of the movie, e.g. "action"
        #[arg(long)]
        genre: String,

        /// Actor who should star in it
        #[arg(long)]
        actor: String,

        /// Also show the title, plot summary and trailer found on the way
        #[arg(long)]
        explain: bool,
    },

    /// Print the stage graph of the chain
    Graph,
}

#[tokio::main]
async fn main() -> Result<()> {
    // before the filter reads RUST_LOG and clap reads the env-backed flags
    dotenvy::dotenv().ok();

    // stdout carries the recommendation only
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Recommend {
            genre,
            actor,
            explain,
        } => handle_recommend(&config, genre, actor, explain).await?,
        Commands::Graph => handle_graph(config)?,
    }

    Ok(())
}

/// File (or defaults), then environment, then flags.
fn load_config(cli: &Cli) -> Result<ChainConfig> {
    let mut config = match &cli.config {
        Some(path) => ChainConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ChainConfig::default(),
    };
    config.apply_env(|key| std::env::var(key).ok());

    config.apply_overrides(ModelOverrides {
        host: cli.host.clone(),
        token: cli.token.clone(),
        endpoint: cli.endpoint.clone(),
        max_tokens: cli.max_tokens,
    });
    Ok(config)
}

/// Handle the 'recommend' command
async fn handle_recommend(
    config: &ChainConfig,
    genre: String,
    actor: String,
    explain: bool,
) -> Result<()> {
    let request = RecommendationRequest::new(genre, actor)?;
    let orchestrator = RecommendationOrchestrator::from_config(config)?;

    let start = Instant::now();
    let recommendation = orchestrator
        .recommend(request)
        .await
        .context("Recommendation chain failed")?;

    if explain {
        print_explanation(&recommendation);
        println!(
            "{} {:.2?}\n",
            "Chain finished in".dimmed(),
            start.elapsed()
        );
    }
    println!("{}", recommendation.text);
    Ok(())
}

/// Handle the 'graph' command
fn handle_graph(mut config: ChainConfig) -> Result<()> {
    // drawing the graph never calls the model
    if config.model.host.trim().is_empty() {
        config.model.host = "localhost".to_string();
    }
    let orchestrator = RecommendationOrchestrator::from_config(&config)?;
    print!("{}", orchestrator.graph());
    Ok(())
}

fn print_explanation(recommendation: &Recommendation) {
    println!("{} {}", "Movie:".bold().green(), recommendation.title.bold());
    println!("{}", "Plot:".bold().green());
    println!("{}", recommendation.summary);
    println!(
        "{} {}",
        "Trailer:".bold().green(),
        recommendation.trailer.cyan()
    );
    println!("{}", "-".repeat(60).dimmed());
}
