//! Configuration types for statement analysis.
//!
//! All analysis behaviour is controlled through [`AnalysisConfig`], built via
//! its [`AnalysisConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share the config across requests, serialise it for logging, and
//! diff two deployments to understand why their outputs differ.
//!
//! The API credential lives in a separate [`Credentials`] object, constructed
//! exactly once at process entry and passed into the completion client.
//! Nothing in the library reads the environment at call time.

use crate::error::SpendwiseError;
use serde::{Deserialize, Serialize};

/// Environment variable holding the AIML API key.
pub const API_KEY_ENV: &str = "AIML_API_KEY";

/// Default chat-completions endpoint of the AIML aggregator.
pub const DEFAULT_BASE_URL: &str = "https://api.aimlapi.com/v1";

/// Default chat model identifier.
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat";

/// Configuration for a statement analysis.
///
/// Built via [`AnalysisConfig::builder()`] or using
/// [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use spendwise::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .model("deepseek/deepseek-chat")
///     .temperature(0.7)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Base URL of the OpenAI-compatible chat-completions API.
    /// Default: the AIML aggregator endpoint.
    pub base_url: String,

    /// Chat model identifier. Default: `deepseek/deepseek-chat`.
    pub model: String,

    /// Maximum tokens the model may generate. Default: 2000.
    ///
    /// The advice template produces three short markdown sections; 2000
    /// output tokens covers it with headroom. Setting this too low truncates
    /// the recommendations mid-list.
    pub max_tokens: usize,

    /// Sampling temperature for the completion. Default: 0.7.
    ///
    /// Budgeting advice benefits from some variety in phrasing, so the
    /// default sits above the near-deterministic range. The fixed prompt
    /// template, not the temperature, is what keeps the output structure
    /// stable.
    pub temperature: f32,

    /// Monthly income assumed when the form supplies none. Default: 5000.
    pub default_income: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2000,
            temperature: 0.7,
            default_income: 5000,
        }
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n.max(1);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn default_income(mut self, income: u32) -> Self {
        self.config.default_income = income;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, SpendwiseError> {
        let c = &self.config;
        if c.base_url.trim().is_empty() {
            return Err(SpendwiseError::Configuration {
                message: "Base URL must not be empty".into(),
            });
        }
        if c.model.trim().is_empty() {
            return Err(SpendwiseError::Configuration {
                message: "Model identifier must not be empty".into(),
            });
        }
        Ok(self.config)
    }
}

/// The API credential for the completion provider.
///
/// Constructed once at process entry: either from the environment via
/// [`Credentials::from_env`] (the binary does this before anything else) or
/// directly from a string in tests. The completion client borrows it at
/// construction time; absence of the key is a fatal startup condition, never
/// a per-request error.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Wrap an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Read the credential from `AIML_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`SpendwiseError::Configuration`] when the variable is unset
    /// or blank.
    pub fn from_env() -> Result<Self, SpendwiseError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self { api_key: key }),
            _ => Err(SpendwiseError::Configuration {
                message: "Please configure the AIML API key in environment variables.".into(),
            }),
        }
    }

    /// The raw key, for building the Authorization header.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

// Keep the key out of debug logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_invocation_parameters() {
        let c = AnalysisConfig::default();
        assert_eq!(c.model, "deepseek/deepseek-chat");
        assert_eq!(c.max_tokens, 2000);
        assert!((c.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(c.default_income, 5000);
    }

    #[test]
    fn builder_clamps_temperature() {
        let c = AnalysisConfig::builder()
            .temperature(9.0)
            .build()
            .unwrap();
        assert!((c.temperature - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn builder_rejects_empty_model() {
        let result = AnalysisConfig::builder().model("  ").build();
        assert!(matches!(
            result,
            Err(SpendwiseError::Configuration { .. })
        ));
    }

    #[test]
    fn credentials_debug_redacts_key() {
        let creds = Credentials::new("sk-secret");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("sk-secret"));
    }
}
