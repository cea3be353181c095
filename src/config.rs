//! Configuration types for summarisation.
//!
//! All client behaviour is controlled through [`SummarizeConfig`], built via
//! its [`SummarizeConfigBuilder`]. Only the API key is read from the
//! environment, and only when the caller did not supply one.

use crate::error::SummarizeError;
use crate::pipeline::retry::RetryPolicy;
use crate::progress::ProgressCallback;
use std::fmt;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default Gemini REST base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Configuration for the summarisation client.
///
/// # Example
/// ```rust
/// use edgequake_summarize::SummarizeConfig;
///
/// let config = SummarizeConfig::builder()
///     .api_key("test-key")
///     .model("gemini-2.0-flash")
///     .max_attempts(3)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_attempts, 3);
/// ```
#[derive(Clone)]
pub struct SummarizeConfig {
    /// API key. If None, [`API_KEY_ENV`] is read when the client is built.
    pub api_key: Option<String>,

    /// REST base URL, without a trailing slash. Default: [`DEFAULT_API_BASE`].
    pub api_base: String,

    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Total attempts per request, including the first. Default: 5.
    pub max_attempts: u32,

    /// Backoff base in milliseconds; the wait after attempt `n` (0-based)
    /// is `2^n * backoff_base_ms` plus jitter. Default: 1000.
    pub backoff_base_ms: u64,

    /// Upper bound of the uniform random jitter added to each wait. Default: 1000.
    pub max_jitter_ms: u64,

    /// Retry when a success response carries no summary text. Default: false.
    pub retry_malformed: bool,

    /// Custom system prompt. If None, uses the built-in default.
    pub system_prompt: Option<String>,

    /// Run the Markdown clean-up rules on the returned text. Default: true.
    pub clean_output: bool,

    /// Per-attempt HTTP timeout in seconds. Default: None (transport default).
    pub request_timeout_secs: Option<u64>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional per-attempt progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_attempts: 5,
            backoff_base_ms: 1000,
            max_jitter_ms: 1000,
            retry_malformed: false,
            system_prompt: None,
            clean_output: true,
            request_timeout_secs: None,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SummarizeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizeConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_attempts", &self.max_attempts)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .field("max_jitter_ms", &self.max_jitter_ms)
            .field("retry_malformed", &self.retry_malformed)
            .field("clean_output", &self.clean_output)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn SummaryProgressCallback>"),
            )
            .finish()
    }
}

impl SummarizeConfig {
    /// Create a new builder for `SummarizeConfig`.
    pub fn builder() -> SummarizeConfigBuilder {
        SummarizeConfigBuilder {
            config: Self::default(),
        }
    }

    /// The retry policy described by this config.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff_base_ms: self.backoff_base_ms,
            max_jitter_ms: self.max_jitter_ms,
            retry_malformed: self.retry_malformed,
        }
    }

    /// The configured key, falling back to [`API_KEY_ENV`].
    pub fn resolve_api_key(&self) -> Result<String, SummarizeError> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SummarizeError::MissingApiKey {
                var: API_KEY_ENV.to_string(),
            })
    }

    /// `generateContent` URL for the configured model, without the key.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

/// Builder for [`SummarizeConfig`].
#[derive(Debug)]
pub struct SummarizeConfigBuilder {
    config: SummarizeConfig,
}

impl SummarizeConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.config.api_base = base.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.config.max_attempts = n;
        self
    }

    pub fn backoff_base_ms(mut self, ms: u64) -> Self {
        self.config.backoff_base_ms = ms;
        self
    }

    pub fn max_jitter_ms(mut self, ms: u64) -> Self {
        self.config.max_jitter_ms = ms;
        self
    }

    pub fn retry_malformed(mut self, v: bool) -> Self {
        self.config.retry_malformed = v;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn clean_output(mut self, v: bool) -> Self {
        self.config.clean_output = v;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummarizeConfig, SummarizeError> {
        let c = &self.config;
        if c.max_attempts == 0 {
            return Err(SummarizeError::InvalidConfig(
                "max_attempts must be ≥ 1".into(),
            ));
        }
        // 2^n overflows u64 milliseconds well before n = 32.
        if c.max_attempts > 32 {
            return Err(SummarizeError::InvalidConfig(format!(
                "max_attempts must be ≤ 32, got {}",
                c.max_attempts
            )));
        }
        if c.model.trim().is_empty() {
            return Err(SummarizeError::InvalidConfig("model must not be empty".into()));
        }
        if !(c.api_base.starts_with("http://") || c.api_base.starts_with("https://")) {
            return Err(SummarizeError::InvalidConfig(format!(
                "api_base must be an HTTP/HTTPS URL, got '{}'",
                c.api_base
            )));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(SummarizeError::InvalidConfig(
                "request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let c = SummarizeConfig::default();
        assert_eq!(c.max_attempts, 5);
        assert_eq!(c.backoff_base_ms, 1000);
        assert_eq!(c.max_jitter_ms, 1000);
        assert!(!c.retry_malformed);
        assert!(c.request_timeout_secs.is_none());
    }

    #[test]
    fn zero_attempts_rejected() {
        let err = SummarizeConfig::builder().max_attempts(0).build().unwrap_err();
        assert!(matches!(err, SummarizeError::InvalidConfig(_)));
    }

    #[test]
    fn non_http_base_rejected() {
        let err = SummarizeConfig::builder()
            .api_base("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("ftp://example.com"));
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let c = SummarizeConfig::builder()
            .api_base("http://127.0.0.1:9000/v1beta/")
            .model("gemini-test")
            .build()
            .unwrap();
        assert_eq!(
            c.endpoint(),
            "http://127.0.0.1:9000/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn explicit_key_wins_and_is_redacted() {
        let c = SummarizeConfig::builder().api_key(" secret ").build().unwrap();
        assert_eq!(c.resolve_api_key().unwrap(), "secret");
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn blank_explicit_key_is_missing() {
        // A blank key never falls through to the environment.
        let c = SummarizeConfig::builder().api_key("  ").build().unwrap();
        assert!(matches!(
            c.resolve_api_key(),
            Err(SummarizeError::MissingApiKey { .. })
        ));
    }
}
