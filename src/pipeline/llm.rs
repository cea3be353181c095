//! Model interaction: send the payload and drive the retry loop.
//!
//! This module performs I/O, waits, and tidies each reply. Whether to
//! retry, and for how long to back off, is decided by [`crate::pipeline::retry`]; all prompt
//! text lives in [`crate::prompts`].
//!
//! ## Retry Strategy
//!
//! With the default policy the waits after failed attempts are
//! `1 s, 2 s, 4 s, 8 s` (each plus up to 1 s of jitter), for at most 5
//! attempts. HTTP 429, other non-success statuses, network errors and
//! undecodable bodies are retried alike.

use crate::error::{AttemptError, SummarizeError};
use crate::pipeline::payload::GenerateContentResponse;
use crate::pipeline::postprocess;
use crate::pipeline::retry::{decide_next_action, NextAction, RetryPolicy};
use crate::pipeline::transport::{Transport, TransportResponse};
use crate::progress::ProgressCallback;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

/// Final result of the retry loop and the number of attempts it took.
#[derive(Debug)]
pub struct CallOutcome {
    pub result: Result<String, SummarizeError>,
    /// 1-indexed count of attempts made.
    pub attempts: u32,
}

/// Send `body` until it succeeds or the policy gives up.
///
/// Never returns early with a partial result: the loop ends only on
/// success or on a terminal failure from [`decide_next_action`].
pub async fn generate_with_retry(
    transport: &dyn Transport,
    url: &str,
    api_key: &str,
    body: &serde_json::Value,
    policy: &RetryPolicy,
    clean_output: bool,
    progress: Option<&ProgressCallback>,
) -> CallOutcome {
    let mut attempt: u32 = 0;

    loop {
        if let Some(cb) = progress {
            cb.on_attempt_start(attempt + 1, policy.max_attempts);
        }

        let outcome = attempt_once(transport, url, api_key, body, clean_output).await;
        if let Err(ref e) = outcome {
            warn!("Attempt {}/{} failed: {}", attempt + 1, policy.max_attempts, e);
        }

        let reason = outcome.as_ref().err().map(ToString::to_string);
        match decide_next_action(policy, attempt, outcome, policy.sample_jitter()) {
            NextAction::Retry { delay_ms } => {
                warn!(
                    "Retry {}/{} after {}ms",
                    attempt + 2,
                    policy.max_attempts,
                    delay_ms
                );
                if let Some(cb) = progress {
                    cb.on_retry_scheduled(attempt + 1, delay_ms, reason.as_deref().unwrap_or(""));
                }
                sleep(Duration::from_millis(delay_ms)).await;
                attempt += 1;
            }
            NextAction::Succeed(text) => {
                debug!("Attempt {} succeeded: {} chars", attempt + 1, text.len());
                return CallOutcome {
                    result: Ok(text),
                    attempts: attempt + 1,
                };
            }
            NextAction::Fail(err) => {
                return CallOutcome {
                    result: Err(err),
                    attempts: attempt + 1,
                };
            }
        }
    }
}

/// One HTTP round-trip, classified and optionally cleaned.
///
/// Cleaning happens here so a reply that is empty once tidied counts as a
/// malformed attempt and goes through the retry policy like any other.
async fn attempt_once(
    transport: &dyn Transport,
    url: &str,
    api_key: &str,
    body: &serde_json::Value,
    clean_output: bool,
) -> Result<String, AttemptError> {
    let response = transport.post_json(url, api_key, body).await?;
    let text = classify(response)?;
    if !clean_output {
        return Ok(text);
    }
    let cleaned = postprocess::clean_markdown(&text);
    if cleaned.trim().is_empty() {
        return Err(AttemptError::Malformed(
            "summary is empty after clean-up".into(),
        ));
    }
    Ok(cleaned)
}

/// Map a raw response onto the summary text or an [`AttemptError`].
pub fn classify(response: TransportResponse) -> Result<String, AttemptError> {
    match response.status {
        429 => Err(AttemptError::RateLimited),
        200..=299 => {
            let parsed: GenerateContentResponse = serde_json::from_str(&response.body)
                .map_err(|e| AttemptError::Decode(e.to_string()))?;
            parsed
                .first_text()
                .map(str::to_string)
                .map_err(AttemptError::Malformed)
        }
        status => Err(AttemptError::http_status(status, &response.body)),
    }
}
