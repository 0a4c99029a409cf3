//! Analysis entry points: the pipeline composed as one function chain.
//!
//! Each call is a fully independent, stateless invocation: the statement
//! bytes come in, text extraction and the prompt template run locally, one
//! completion call goes out, and the advice (or a typed error) comes back.
//! Nothing persists between calls and no stage touches shared mutable state,
//! so the same function serves the web handler, tests, and any future
//! front-end without an event-loop or re-render cycle around it.

use crate::error::SpendwiseError;
use crate::pipeline::completion::CompletionProvider;
use crate::pipeline::extract;
use crate::prompts;
use std::sync::Arc;
use tracing::{debug, info};

/// One statement analysis request.
///
/// Built fresh per invocation and immutable once constructed.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Monthly income in whole dollars. Non-negative by construction.
    pub monthly_income: u32,
    /// The full extracted statement text.
    pub statement_text: String,
}

/// Analyze a PDF statement and return markdown budgeting advice.
///
/// This is the primary entry point for the library.
///
/// # Errors
///
/// * [`SpendwiseError::DocumentParse`]: the bytes are not a valid PDF.
/// * [`SpendwiseError::EmptyDocument`]: no extractable text (the completion
///   provider is never called in this case).
/// * [`SpendwiseError::Completion`]: the one completion call failed.
pub async fn analyze_statement(
    bytes: &[u8],
    monthly_income: u32,
    provider: &Arc<dyn CompletionProvider>,
) -> Result<String, SpendwiseError> {
    info!("Analyzing statement ({} bytes)", bytes.len());

    // ── Step 1: Extract text ─────────────────────────────────────────────
    let statement_text = extract::extract_text(bytes)?;

    analyze_text(statement_text, monthly_income, provider).await
}

/// Analyze already-extracted statement text.
///
/// Split out from [`analyze_statement`] so the empty-document short-circuit
/// and the completion hand-off are testable without real PDF bytes.
pub async fn analyze_text(
    statement_text: String,
    monthly_income: u32,
    provider: &Arc<dyn CompletionProvider>,
) -> Result<String, SpendwiseError> {
    // ── Step 2: Reject empty statements before any network call ─────────
    if statement_text.trim().is_empty() {
        debug!("Extracted text is empty; skipping completion call");
        return Err(SpendwiseError::EmptyDocument);
    }

    let request = AnalysisRequest {
        monthly_income,
        statement_text,
    };

    // ── Step 3: Build the fixed prompt pair ──────────────────────────────
    let user_prompt = prompts::build_user_prompt(request.monthly_income, &request.statement_text);
    debug!(
        "Built prompt: {} chars for income ${}",
        user_prompt.len(),
        request.monthly_income
    );

    // ── Step 4: One completion call ──────────────────────────────────────
    let completion = provider.complete(prompts::SYSTEM_PROMPT, &user_prompt).await?;

    info!("Analysis complete ({} chars of advice)", completion.content.len());
    Ok(completion.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::completion::Completion;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counting mock: returns a canned response and records each call.
    struct MockProvider {
        calls: AtomicUsize,
        response: Result<String, ()>,
    }

    impl MockProvider {
        fn ok(content: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Ok(content.to_string()),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Err(()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl CompletionProvider for MockProvider {
        async fn complete(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
        ) -> Result<Completion, SpendwiseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(content) => Ok(Completion {
                    content: content.clone(),
                }),
                Err(()) => Err(SpendwiseError::Completion {
                    detail: "mock failure".into(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn empty_text_short_circuits_without_calling_provider() {
        let mock = Arc::new(MockProvider::ok("unused"));
        let provider: Arc<dyn CompletionProvider> = mock.clone();

        let result = analyze_text("   \n\t ".to_string(), 3000, &provider).await;

        assert!(matches!(result, Err(SpendwiseError::EmptyDocument)));
        assert_eq!(mock.calls(), 0, "no completion request may be sent");
    }

    #[tokio::test]
    async fn advice_is_returned_unmodified() {
        let advice = "## Financial Analysis & Recommendations\n- save more";
        let mock = Arc::new(MockProvider::ok(advice));
        let provider: Arc<dyn CompletionProvider> = mock.clone();

        let result = analyze_text("Coffee $5.00".to_string(), 3000, &provider)
            .await
            .unwrap();

        assert_eq!(result, advice);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn completion_failure_maps_to_fixed_banner() {
        let mock = Arc::new(MockProvider::failing());
        let provider: Arc<dyn CompletionProvider> = mock.clone();

        let err = analyze_text("Coffee $5.00".to_string(), 3000, &provider)
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "No recommendations generated.");
        assert_eq!(mock.calls(), 1);
    }
}
