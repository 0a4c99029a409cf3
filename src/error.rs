//! Error types for the spendwise library.
//!
//! One closed enum covers every failure the pipeline can produce. The
//! variants deliberately mirror the recovery policy:
//!
//! * [`SpendwiseError::Configuration`] is **fatal at startup**: the process
//!   cannot serve requests at all (missing API credential). Never produced
//!   per-request.
//!
//! * Everything else is **recovered locally**: mapped at the HTTP boundary to
//!   a fixed user-visible banner string via [`SpendwiseError::user_message`],
//!   while the `Display` impl keeps the diagnostic cause for logs.
//!
//! The split matters because the user-facing strings are part of the
//! product's contract (the page shows exactly them), whereas the internal
//! detail exists only so operators can tell an auth failure from a network
//! blip without it ever reaching the browser.

use thiserror::Error;

/// All errors produced by the spendwise library.
#[derive(Debug, Error)]
pub enum SpendwiseError {
    // ── Startup errors ────────────────────────────────────────────────────
    /// Required configuration is missing or invalid. Halts startup.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // ── Document errors ───────────────────────────────────────────────────
    /// The uploaded bytes could not be parsed as a PDF.
    #[error("Failed to parse PDF: {detail}")]
    DocumentParse { detail: String },

    /// The PDF parsed but contained no extractable text (scanned or
    /// image-only statements land here).
    #[error("PDF contains no extractable text")]
    EmptyDocument,

    // ── Completion errors ─────────────────────────────────────────────────
    /// The completion call failed: transport error, non-success HTTP status,
    /// auth rejection, or a response with no usable message content.
    #[error("Completion request failed: {detail}")]
    Completion { detail: String },

    // ── Request errors (web boundary) ─────────────────────────────────────
    /// A sample statement name did not resolve to a file in the sample
    /// directory.
    #[error("Sample statement not found: '{name}'")]
    SampleNotFound { name: String },

    /// The analysis form was malformed (missing file, bad income value,
    /// unreadable multipart body).
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl SpendwiseError {
    /// The fixed banner string shown to the user for this error kind.
    ///
    /// Completion failures collapse to one generic message regardless of
    /// cause (auth vs. network vs. empty content); callers log the `Display`
    /// form before mapping so the cause is not lost.
    pub fn user_message(&self) -> String {
        match self {
            SpendwiseError::Configuration { message } => message.clone(),
            SpendwiseError::DocumentParse { .. } => {
                "Could not read the uploaded PDF. Please upload a valid statement.".to_string()
            }
            SpendwiseError::EmptyDocument => {
                "No readable transactions found in the PDF. Please upload a valid statement."
                    .to_string()
            }
            SpendwiseError::Completion { .. } => "No recommendations generated.".to_string(),
            SpendwiseError::SampleNotFound { name } => {
                format!("Sample statement '{name}' was not found.")
            }
            SpendwiseError::InvalidRequest { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_collapses_to_generic_banner() {
        let auth = SpendwiseError::Completion {
            detail: "HTTP 401: invalid key".into(),
        };
        let network = SpendwiseError::Completion {
            detail: "connection reset by peer".into(),
        };
        assert_eq!(auth.user_message(), "No recommendations generated.");
        assert_eq!(network.user_message(), auth.user_message());
    }

    #[test]
    fn completion_display_keeps_cause() {
        let e = SpendwiseError::Completion {
            detail: "HTTP 401: invalid key".into(),
        };
        assert!(e.to_string().contains("401"), "got: {e}");
    }

    #[test]
    fn empty_document_banner() {
        let msg = SpendwiseError::EmptyDocument.user_message();
        assert_eq!(
            msg,
            "No readable transactions found in the PDF. Please upload a valid statement."
        );
    }

    #[test]
    fn sample_not_found_names_the_sample() {
        let e = SpendwiseError::SampleNotFound {
            name: "march.pdf".into(),
        };
        assert!(e.user_message().contains("march.pdf"));
    }
}
