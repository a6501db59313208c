//! Command-line entry point for running one research session end-to-end:
//! loads config, wires an Anthropic provider and HTTP search tool, runs the
//! Loop (optionally resuming from a checkpoint, with session continuation),
//! and prints the synthesized report.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eyre::{Context, Result};

use research_loop::checkpoint::{CheckpointSource, FileCheckpointStore};
use research_loop::config::Config;
use research_loop::continuation::run_with_continuations;
use research_loop::domain::ResearchContext;
use research_loop::llm::AnthropicProvider;
use research_loop::progress::TracingProgressReporter;
use research_loop::r#loop::Loop;
use research_loop::tools::{HttpSearchTool, Tool};

/// Run an iterative research loop over a question and print the resulting report.
#[derive(Parser)]
#[command(name = "research-loop", about = "Plan -> Search -> Extract -> Evaluate -> Completeness -> Synthesize")]
struct Cli {
    /// The research question to investigate.
    question: String,

    /// Path to a YAML config file; falls back to the default search chain.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", default_value = "info")]
    log_level: String,

    /// Case title supplied as run-level context.
    #[arg(long, default_value = "")]
    case_title: String,

    /// Case position supplied as run-level context.
    #[arg(long, default_value = "")]
    case_position: String,

    /// Environment variable holding the Anthropic API key.
    #[arg(long, default_value = "ANTHROPIC_API_KEY")]
    api_key_env: String,

    /// Anthropic model name.
    #[arg(long, default_value = "claude-sonnet-4-5")]
    model: String,

    /// Per-call max output tokens.
    #[arg(long, default_value_t = 4096)]
    max_tokens: u32,

    /// Provider context window, in tokens, used for budget tracking.
    #[arg(long, default_value_t = 180_000)]
    context_window_tokens: u64,

    /// Per-request provider timeout, in seconds.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Base URL of the HTTP search backend (expects a JSON array of
    /// {url, title, snippet} per query).
    #[arg(long)]
    search_url: Option<String>,

    /// Directory for checkpoint files.
    #[arg(long, default_value = "./checkpoints")]
    checkpoint_dir: PathBuf,

    /// Resume a prior run from its correlation id instead of starting fresh.
    #[arg(long)]
    resume: Option<String>,
}

fn setup_logging(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let config = Config::load(cli.config.as_deref()).context("loading config")?;
    let config_errors = config.validate();
    if !config_errors.is_empty() {
        for error in &config_errors {
            tracing::error!(%error, "invalid configuration");
        }
        eyre::bail!("configuration failed validation");
    }

    let provider = Arc::new(
        AnthropicProvider::from_env(
            &cli.api_key_env,
            cli.model.clone(),
            cli.max_tokens,
            cli.context_window_tokens,
            Duration::from_secs(cli.timeout_secs),
        )
        .context("constructing Anthropic provider")?,
    );

    let mut tools: Vec<Arc<dyn Tool>> = Vec::new();
    if let Some(search_url) = &cli.search_url {
        tools.push(Arc::new(
            HttpSearchTool::new("web", search_url.clone(), Duration::from_secs(cli.timeout_secs))
                .map_err(|err| eyre::eyre!("constructing search tool: {err}"))?,
        ));
    }

    let checkpoint_store = Arc::new(FileCheckpointStore::new(cli.checkpoint_dir.clone()));

    let research_loop = Loop::new(config, "", provider, tools)
        .with_progress(Arc::new(TracingProgressReporter))
        .with_checkpoint_sink(checkpoint_store.clone());

    let context = ResearchContext {
        case_title: cli.case_title.clone(),
        case_position: cli.case_position.clone(),
        ..Default::default()
    };

    let result = if let Some(correlation_id) = &cli.resume {
        let checkpoint = checkpoint_store
            .load(correlation_id)
            .await
            .context("loading checkpoint")?
            .ok_or_else(|| eyre::eyre!("no checkpoint found for correlation id {correlation_id}"))?;
        let resuming_loop = research_loop.with_correlation_id(correlation_id.clone());
        resuming_loop.resume_from_checkpoint(checkpoint, &context).await?
    } else {
        run_with_continuations(&research_loop, &cli.question, &context).await?
    };

    println!("{}", result.content);
    tracing::info!(
        sources = result.metadata.total_sources,
        continuations = result.metadata.continuations,
        "research run complete"
    );

    Ok(())
}
