//! Server binary for spendwise.
//!
//! A thin shim over the library crate: parse flags, read the API credential
//! exactly once, build the completion client, and serve the page.

use anyhow::{Context, Result};
use clap::Parser;
use spendwise::{router, AimlClient, AnalysisConfig, AppState, CompletionProvider, Credentials};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Start on the default port
  AIML_API_KEY=... spendwise

  # Custom port and sample directory
  spendwise --port 8080 --sample-dir ./statements

  # Point at a different OpenAI-compatible endpoint and model
  spendwise --base-url https://api.example.com/v1 --model gpt-4o-mini

ENVIRONMENT VARIABLES:
  AIML_API_KEY            API key for the completion provider (required;
                          startup fails without it)
  SPENDWISE_HOST          Bind address (default 127.0.0.1)
  SPENDWISE_PORT          Listen port (default 3000)
  SPENDWISE_SAMPLE_DIR    Directory scanned for sample statements
  SPENDWISE_MODEL         Override the chat model identifier
  SPENDWISE_BASE_URL      Override the chat-completions endpoint

SETUP:
  1. Set the API key:  export AIML_API_KEY=...
  2. Start the server: spendwise
  3. Open:             http://127.0.0.1:3000
"#;

/// Analyze PDF credit-card statements and serve budgeting advice.
#[derive(Parser, Debug)]
#[command(
    name = "spendwise",
    version,
    about = "AI-powered personal finance assistant: upload a statement, get budgeting advice",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Bind address.
    #[arg(long, env = "SPENDWISE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Listen port.
    #[arg(short, long, env = "SPENDWISE_PORT", default_value_t = 3000)]
    port: u16,

    /// Directory scanned for sample statements (`*.pdf`).
    #[arg(long, env = "SPENDWISE_SAMPLE_DIR", default_value = "./sample_pdfs")]
    sample_dir: PathBuf,

    /// Chat model identifier (default: deepseek/deepseek-chat).
    #[arg(long, env = "SPENDWISE_MODEL")]
    model: Option<String>,

    /// Chat-completions endpoint (default: the AIML aggregator).
    #[arg(long, env = "SPENDWISE_BASE_URL")]
    base_url: Option<String>,

    /// Income assumed when the form leaves the field blank.
    #[arg(long, env = "SPENDWISE_DEFAULT_INCOME", default_value_t = 5000)]
    default_income: u32,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SPENDWISE_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    // The credential is read exactly once, here. A missing key is a fatal
    // startup condition, not a per-request error.
    let credentials =
        Credentials::from_env().map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;

    let mut builder = AnalysisConfig::builder().default_income(cli.default_income);
    if let Some(ref model) = cli.model {
        builder = builder.model(model.as_str());
    }
    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url.as_str());
    }
    let config = builder.build().context("Invalid configuration")?;

    info!(
        "Using model '{}' via {}",
        config.model, config.base_url
    );

    let provider: Arc<dyn CompletionProvider> =
        Arc::new(AimlClient::new(&credentials, config.clone()));
    let state = AppState::new(provider, config, &cli.sample_dir);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .context("Invalid host/port")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Listening on http://{addr}");
    info!("Sample directory: {}", cli.sample_dir.display());

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}
