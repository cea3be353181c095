//! Summarisation entry points.
//!
//! [`Summarizer`] owns the config, the resolved API key and a
//! [`Transport`]. It exposes two contracts over the same call:
//!
//! * [`Summarizer::try_summarize`] → `Result<Summary, SummarizeError>`
//! * [`Summarizer::summarize`] → `String`, which never fails: an error
//!   becomes its human-readable message, so a view layer can render either
//!   outcome as the "summary" text.

use crate::config::SummarizeConfig;
use crate::error::SummarizeError;
use crate::language::Language;
use crate::output::{Summary, SummaryStats};
use crate::pipeline::payload::GenerateContentRequest;
use crate::pipeline::transport::{HttpTransport, Transport};
use crate::pipeline::{input, llm};
use crate::progress::{ProgressCallback, TeeProgressCallback};
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use crate::request::SummaryRequest;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Client for the summarisation API.
#[derive(Clone)]
pub struct Summarizer {
    config: SummarizeConfig,
    api_key: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Summarizer {
    /// Build a client with the default HTTP transport.
    ///
    /// # Errors
    /// [`SummarizeError::MissingApiKey`] when neither the config nor the
    /// environment provides a key.
    pub fn new(config: SummarizeConfig) -> Result<Self, SummarizeError> {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        let transport = Arc::new(HttpTransport::new(timeout)?);
        Self::with_transport(config, transport)
    }

    /// Build a client over a caller-supplied transport.
    pub fn with_transport(
        config: SummarizeConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, SummarizeError> {
        let api_key = config.resolve_api_key()?;
        Ok(Self {
            config,
            api_key,
            transport,
        })
    }

    pub fn config(&self) -> &SummarizeConfig {
        &self.config
    }

    /// Summarise `request`, returning the report or a structured error.
    pub async fn try_summarize(&self, request: &SummaryRequest) -> Result<Summary, SummarizeError> {
        self.run(request, self.config.progress_callback.clone()).await
    }

    /// Like [`Self::try_summarize`], also reporting this call's events to
    /// `observer` (after the configured callback, if any).
    pub async fn try_summarize_observed(
        &self,
        request: &SummaryRequest,
        observer: ProgressCallback,
    ) -> Result<Summary, SummarizeError> {
        let progress: ProgressCallback = match self.config.progress_callback.clone() {
            Some(configured) => Arc::new(TeeProgressCallback(configured, observer)),
            None => observer,
        };
        self.run(request, Some(progress)).await
    }

    async fn run(
        &self,
        request: &SummaryRequest,
        progress: Option<ProgressCallback>,
    ) -> Result<Summary, SummarizeError> {
        let start = Instant::now();
        let policy = self.config.retry_policy();
        info!(
            "Summarising {:?} input into {} with {}",
            request.input_kind(),
            request.language(),
            self.config.model
        );

        let system_prompt = self
            .config
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);
        let payload = GenerateContentRequest::build(request, system_prompt);
        let body = serde_json::to_value(&payload)
            .map_err(|e| SummarizeError::InvalidConfig(format!("unserialisable payload: {e}")))?;

        let outcome = llm::generate_with_retry(
            self.transport.as_ref(),
            &self.config.endpoint(),
            &self.api_key,
            &body,
            &policy,
            self.config.clean_output,
            progress.as_ref(),
        )
        .await;

        let cb = progress.as_ref();
        match outcome.result {
            Ok(markdown) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                info!(
                    "Summary ready after {} attempt(s): {} chars in {}ms",
                    outcome.attempts,
                    markdown.len(),
                    duration_ms
                );
                if let Some(cb) = cb {
                    cb.on_success(outcome.attempts, markdown.len());
                }
                Ok(Summary {
                    markdown,
                    stats: SummaryStats {
                        attempts: outcome.attempts,
                        duration_ms,
                        input_kind: request.input_kind(),
                        language: request.language(),
                        model: self.config.model.clone(),
                    },
                })
            }
            Err(e) => {
                warn!("Summary failed: {}", e);
                if let Some(cb) = cb {
                    cb.on_failure(outcome.attempts, &e.to_string());
                }
                Err(e)
            }
        }
    }

    /// Summarise `request`; failures come back as their message.
    pub async fn summarize(&self, request: &SummaryRequest) -> String {
        match self.try_summarize(request).await {
            Ok(summary) => summary.markdown,
            Err(e) => e.to_string(),
        }
    }
}

/// Summarise pasted text with a fresh client.
pub async fn summarize_text(
    text: &str,
    focus_instruction: &str,
    language: Language,
    config: &SummarizeConfig,
) -> Result<Summary, SummarizeError> {
    let request = SummaryRequest::from_text(text, focus_instruction, language)?;
    Summarizer::new(config.clone())?.try_summarize(&request).await
}

/// Load a PDF from a path or URL and summarise it with a fresh client.
pub async fn summarize_pdf(
    input_str: impl AsRef<str>,
    focus_instruction: &str,
    language: Language,
    config: &SummarizeConfig,
) -> Result<Summary, SummarizeError> {
    let summarizer = Summarizer::new(config.clone())?;
    let pdf = input::load_pdf(input_str.as_ref(), config.download_timeout_secs).await?;
    let request = SummaryRequest::from_pdf(pdf, focus_instruction, language);
    summarizer.try_summarize(&request).await
}

/// Summarise `request` and write the Markdown to `output_path`.
pub async fn summarize_to_file(
    summarizer: &Summarizer,
    request: &SummaryRequest,
    output_path: impl AsRef<Path>,
) -> Result<SummaryStats, SummarizeError> {
    let output_path = output_path.as_ref();
    let summary = summarizer.try_summarize(request).await?;
    write_summary(output_path, &summary.markdown).await?;
    info!("Wrote summary to {}", output_path.display());
    Ok(summary.stats)
}

/// Write `markdown` to `path`, creating parent directories and ending the
/// file with a newline.
pub async fn write_summary(path: &Path, markdown: &str) -> Result<(), SummarizeError> {
    let map_err = |source| SummarizeError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(map_err)?;
    }
    let mut content = markdown.to_string();
    if !content.ends_with('\n') {
        content.push('\n');
    }
    tokio::fs::write(path, content).await.map_err(map_err)
}
