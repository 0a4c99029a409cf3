//! Completion client: build the two-part chat request and call the model.
//!
//! This module stays thin on purpose: all prompt engineering lives in
//! [`crate::prompts`] so the template can change without touching transport
//! or error handling here.
//!
//! The [`CompletionProvider`] trait is the seam between the pipeline and the
//! network: production code holds an [`AimlClient`] behind
//! `Arc<dyn CompletionProvider>`, tests substitute a mock and count calls.
//!
//! ## One call, no retries
//!
//! Each analysis performs exactly one request. There is no retry loop, no
//! backoff, and no streaming; a failed call is reported as
//! [`SpendwiseError::Completion`] and the boundary collapses it to the
//! generic fallback banner. The request also carries no timeout override;
//! the transport default applies.

use crate::config::{AnalysisConfig, Credentials};
use crate::error::SpendwiseError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A successful model completion.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Text of the first response message.
    pub content: String,
}

/// Trait for chat-completion backends.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one system + user instruction pair and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns [`SpendwiseError::Completion`] on transport failure,
    /// non-success HTTP status, or a response with no usable message.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Completion, SpendwiseError>;
}

/// Chat-completions client for the AIML aggregator (OpenAI-compatible API).
pub struct AimlClient {
    client: reqwest::Client,
    api_key: String,
    config: AnalysisConfig,
}

impl AimlClient {
    /// Create a client from an explicit credential and config.
    ///
    /// The credential is captured here, at construction time; no environment
    /// access happens per request.
    pub fn new(credentials: &Credentials, config: AnalysisConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: credentials.api_key().to_string(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pull the text of the first response message out of a parsed response.
///
/// A response with zero choices, or a first choice whose content is missing
/// or empty, is a completion failure; the caller's fallback policy applies.
fn first_content(response: ChatResponse) -> Result<String, SpendwiseError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| SpendwiseError::Completion {
            detail: "response contained no choices".into(),
        })?;

    match choice.message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => Err(SpendwiseError::Completion {
            detail: "first choice had no message content".into(),
        }),
    }
}

#[async_trait::async_trait]
impl CompletionProvider for AimlClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Completion, SpendwiseError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(model = %self.config.model, "Sending completion request");

        let resp = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| SpendwiseError::Completion {
                detail: format!("request failed: {e}"),
            })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| SpendwiseError::Completion {
                detail: format!("failed to read response body: {e}"),
            })?;

        if !status.is_success() {
            // Prefer the provider's structured error message when present.
            let detail = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}: {body}"));
            return Err(SpendwiseError::Completion { detail });
        }

        let response: ChatResponse =
            serde_json::from_str(&body).map_err(|e| SpendwiseError::Completion {
                detail: format!("malformed response: {e}"),
            })?;

        let content = first_content(response)?;
        debug!("Completion returned {} chars", content.len());

        Ok(Completion { content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serialises_fixed_parameters() {
        let request = ChatRequest {
            model: "deepseek/deepseek-chat",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "persona",
                },
                ChatMessage {
                    role: "user",
                    content: "data",
                },
            ],
            max_tokens: 2000,
            temperature: 0.7,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "deepseek/deepseek-chat");
        assert_eq!(json["max_tokens"], 2000);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "data");
    }

    #[test]
    fn first_content_returns_message_text() {
        let response: ChatResponse = serde_json::from_str(
            r###"{"choices":[{"message":{"role":"assistant","content":"## Advice"}}]}"###,
        )
        .unwrap();
        assert_eq!(first_content(response).unwrap(), "## Advice");
    }

    #[test]
    fn zero_choices_is_a_completion_error() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            first_content(response),
            Err(SpendwiseError::Completion { .. })
        ));
    }

    #[test]
    fn missing_choices_field_is_a_completion_error() {
        let response: ChatResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(matches!(
            first_content(response),
            Err(SpendwiseError::Completion { .. })
        ));
    }

    #[test]
    fn null_content_is_a_completion_error() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(matches!(
            first_content(response),
            Err(SpendwiseError::Completion { .. })
        ));
    }
}
