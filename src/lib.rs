//! # spendwise
//!
//! Analyze PDF credit-card statements and generate budgeting advice with an
//! LLM.
//!
//! ## How it works
//!
//! There is no algorithmic core here, and that is the point: text extraction
//! is delegated to `pdf-extract`, the analysis itself is performed by a
//! remote chat model steered with a fixed prompt template, and this crate
//! supplies the plumbing: a typed pipeline, a closed error taxonomy mapped
//! to fixed user-facing banners, and a small web page to drive it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Extract   per-page text, concatenated in order (pdf-extract)
//!  ├─ 2. Guard     empty/whitespace-only text stops here, no network call
//!  ├─ 3. Prompt    fixed persona + 7-step procedure + response template
//!  ├─ 4. Complete  one chat-completions call (no retries, no streaming)
//!  └─ 5. Render    markdown advice, or a fixed error banner
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spendwise::{analyze_statement, AimlClient, AnalysisConfig, Credentials};
//! use spendwise::CompletionProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::from_env()?; // AIML_API_KEY
//!     let config = AnalysisConfig::default();
//!     let provider: Arc<dyn CompletionProvider> =
//!         Arc::new(AimlClient::new(&credentials, config));
//!
//!     let bytes = std::fs::read("statement.pdf")?;
//!     let advice = analyze_statement(&bytes, 5000, &provider).await?;
//!     println!("{advice}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `web`   | on      | Enables the `spendwise` server binary and the [`server`] module (axum + clap + tracing-subscriber) |
//!
//! Disable `web` when using only the pipeline as a library:
//! ```toml
//! spendwise = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompts;
#[cfg(feature = "web")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze_statement, analyze_text, AnalysisRequest};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, Credentials};
pub use error::SpendwiseError;
pub use pipeline::completion::{AimlClient, Completion, CompletionProvider};
pub use pipeline::extract::extract_text;
#[cfg(feature = "web")]
pub use server::{router, AppState};
