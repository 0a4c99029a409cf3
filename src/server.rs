//! HTTP surface for the statement-analysis page.
//!
//! Serves the single page plus three JSON endpoints:
//!
//! - `GET  /`            - the upload/analyze page (embedded HTML)
//! - `GET  /health`      - liveness probe
//! - `GET  /api/samples` - `*.pdf` files available in the sample directory
//! - `POST /api/analyze` - multipart form (statement bytes or sample name,
//!   income) returning markdown advice or a banner string
//!
//! Every pipeline failure is mapped here, at the boundary, to one of the
//! fixed user-facing strings; the underlying cause is logged and never
//! reaches the browser. Each request is stateless: the handler reads the
//! form, runs the pipeline once, and replies.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::analyze::analyze_statement;
use crate::config::AnalysisConfig;
use crate::error::SpendwiseError;
use crate::pipeline::completion::CompletionProvider;

/// The single page, embedded at compile time.
const INDEX_HTML: &str = include_str!("../static/index.html");

/// Upload cap. Statements are a few hundred KB; 20 MB leaves generous slack
/// without letting a stray upload exhaust memory.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The completion backend, swappable for tests.
    pub provider: Arc<dyn CompletionProvider>,
    /// Analysis configuration (model parameters, default income).
    pub config: AnalysisConfig,
    /// Directory scanned for sample statements.
    pub sample_dir: PathBuf,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        config: AnalysisConfig,
        sample_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            provider,
            config,
            sample_dir: sample_dir.into(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/api/samples", get(handle_list_samples))
        .route("/api/analyze", post(handle_analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

// ── Error mapping ────────────────────────────────────────────────────────

/// Boundary wrapper turning [`SpendwiseError`] into an HTTP response.
///
/// The JSON body carries the fixed user-facing banner; the diagnostic cause
/// goes to the log right here and nowhere else.
pub struct ApiError(pub SpendwiseError);

impl From<SpendwiseError> for ApiError {
    fn from(err: SpendwiseError) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!("Request failed: {}", self.0);

        let (status, code) = match &self.0 {
            SpendwiseError::Configuration { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION")
            }
            SpendwiseError::DocumentParse { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "DOCUMENT_PARSE")
            }
            SpendwiseError::EmptyDocument => {
                (StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_DOCUMENT")
            }
            SpendwiseError::Completion { .. } => (StatusCode::BAD_GATEWAY, "COMPLETION_FAILED"),
            SpendwiseError::SampleNotFound { .. } => (StatusCode::NOT_FOUND, "SAMPLE_NOT_FOUND"),
            SpendwiseError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        };

        let body = ErrorResponse {
            success: false,
            error: self.0.user_message(),
            code,
        };

        (status, Json(body)).into_response()
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────

/// Handler: GET /
async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "spendwise",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Sample listing response.
#[derive(Serialize)]
pub struct SamplesResponse {
    pub success: bool,
    pub samples: Vec<String>,
    pub count: usize,
}

/// Handler: GET /api/samples
///
/// Lists `*.pdf` filenames in the sample directory, sorted for stable
/// display order. A missing directory is an empty list, not an error; the
/// page simply offers no samples.
pub async fn handle_list_samples(State(state): State<AppState>) -> Json<SamplesResponse> {
    let mut samples = Vec::new();

    if let Ok(mut entries) = tokio::fs::read_dir(&state.sample_dir).await {
        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if Path::new(name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
            {
                samples.push(name.to_string());
            }
        }
    }

    samples.sort();
    let count = samples.len();

    Json(SamplesResponse {
        success: true,
        samples,
        count,
    })
}

/// Analysis response.
#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    /// Markdown advice, rendered client-side.
    pub markdown: String,
}

/// Handler: POST /api/analyze
///
/// Multipart fields: `statement` (uploaded PDF bytes, takes precedence),
/// `sample` (filename within the sample directory), `income` (non-negative
/// whole dollars; blank falls back to the configured default).
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let mut uploaded: Option<Vec<u8>> = None;
    let mut sample: Option<String> = None;
    let mut income_raw: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SpendwiseError::InvalidRequest {
            message: format!("Unreadable form data: {e}"),
        })?
    {
        // The field name borrow must end before `bytes()`/`text()` consume
        // the field.
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("statement") => {
                let bytes = field.bytes().await.map_err(|e| {
                    SpendwiseError::InvalidRequest {
                        message: format!("Failed to read uploaded file: {e}"),
                    }
                })?;
                if !bytes.is_empty() {
                    uploaded = Some(bytes.to_vec());
                }
            }
            Some("sample") => {
                let value = field.text().await.map_err(|e| {
                    SpendwiseError::InvalidRequest {
                        message: format!("Failed to read form field: {e}"),
                    }
                })?;
                if !value.trim().is_empty() {
                    sample = Some(value.trim().to_string());
                }
            }
            Some("income") => {
                income_raw = Some(field.text().await.map_err(|e| {
                    SpendwiseError::InvalidRequest {
                        message: format!("Failed to read form field: {e}"),
                    }
                })?);
            }
            _ => {}
        }
    }

    let income = parse_income(income_raw.as_deref(), state.config.default_income)?;

    // Uploaded file wins over the sample selector, matching the form's
    // "upload your own" priority.
    let bytes = match (uploaded, sample) {
        (Some(bytes), _) => bytes,
        (None, Some(name)) => read_sample(&state.sample_dir, &name).await?,
        (None, None) => {
            return Err(SpendwiseError::InvalidRequest {
                message: "Please upload a statement or choose a sample file.".into(),
            }
            .into())
        }
    };

    info!("Analyze request: {} bytes, income ${income}", bytes.len());

    let markdown = analyze_statement(&bytes, income, &state.provider).await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        markdown,
    }))
}

// ── Form helpers ─────────────────────────────────────────────────────────

/// Parse the income field: blank means the configured default, anything else
/// must be a non-negative whole number.
fn parse_income(raw: Option<&str>, default: u32) -> Result<u32, SpendwiseError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse::<u32>().map_err(|_| {
            SpendwiseError::InvalidRequest {
                message: format!("Income must be a non-negative whole number, got '{value}'"),
            }
        }),
    }
}

/// Read a sample statement by filename.
///
/// The name must be a plain filename; anything that could traverse out of
/// the sample directory is rejected before touching the filesystem.
async fn read_sample(sample_dir: &Path, name: &str) -> Result<Vec<u8>, SpendwiseError> {
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(SpendwiseError::InvalidRequest {
            message: format!("Invalid sample name '{name}'"),
        });
    }

    let path = sample_dir.join(name);
    tokio::fs::read(&path)
        .await
        .map_err(|_| SpendwiseError::SampleNotFound {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::completion::Completion;

    struct NoopProvider;

    #[async_trait::async_trait]
    impl CompletionProvider for NoopProvider {
        async fn complete(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
        ) -> Result<Completion, SpendwiseError> {
            Ok(Completion {
                content: "advice".into(),
            })
        }
    }

    fn state_with_samples(dir: &Path) -> AppState {
        AppState::new(Arc::new(NoopProvider), AnalysisConfig::default(), dir)
    }

    #[tokio::test]
    async fn health_reports_service_name() {
        let response = handle_health().await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.service, "spendwise");
    }

    #[tokio::test]
    async fn samples_lists_only_pdfs_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_statement.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("a_statement.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let response = handle_list_samples(State(state_with_samples(dir.path()))).await;
        assert!(response.success);
        assert_eq!(
            response.samples,
            vec!["a_statement.pdf".to_string(), "b_statement.pdf".to_string()]
        );
        assert_eq!(response.count, 2);
    }

    #[tokio::test]
    async fn samples_missing_dir_is_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("does-not-exist");
        let response = handle_list_samples(State(state_with_samples(&gone))).await;
        assert!(response.samples.is_empty());
    }

    #[test]
    fn income_blank_uses_default() {
        assert_eq!(parse_income(None, 5000).unwrap(), 5000);
        assert_eq!(parse_income(Some("   "), 5000).unwrap(), 5000);
    }

    #[test]
    fn income_rejects_negative_and_garbage() {
        assert!(parse_income(Some("-1"), 5000).is_err());
        assert!(parse_income(Some("lots"), 5000).is_err());
        assert_eq!(parse_income(Some("3000"), 5000).unwrap(), 3000);
    }

    #[tokio::test]
    async fn sample_names_cannot_traverse() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["../secrets.pdf", "a/b.pdf", "..\\c.pdf"] {
            let result = read_sample(dir.path(), name).await;
            assert!(
                matches!(result, Err(SpendwiseError::InvalidRequest { .. })),
                "'{name}' must be rejected"
            );
        }
    }

    #[tokio::test]
    async fn unknown_sample_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_sample(dir.path(), "nope.pdf").await;
        assert!(matches!(
            result,
            Err(SpendwiseError::SampleNotFound { .. })
        ));
    }
}
