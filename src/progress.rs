//! Progress-callback trait for per-attempt summarisation events.
//!
//! Inject an [`Arc<dyn SummaryProgressCallback>`] via
//! [`crate::config::SummarizeConfigBuilder::progress_callback`] to observe
//! the retry loop: when an attempt starts, when a retry is scheduled and
//! how long the client will wait, and how the call ended. The CLI uses this
//! to drive its spinner; a host application could forward the events to a
//! channel or a UI.
//!
//! # Example
//!
//! ```rust
//! use edgequake_summarize::{SummaryProgressCallback, SummarizeConfig};
//! use std::sync::{Arc, atomic::{AtomicU32, Ordering}};
//!
//! struct AttemptCounter(AtomicU32);
//!
//! impl SummaryProgressCallback for AttemptCounter {
//!     fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
//!         self.0.store(attempt, Ordering::SeqCst);
//!         eprintln!("attempt {attempt}/{max_attempts}");
//!     }
//! }
//!
//! let config = SummarizeConfig::builder()
//!     .api_key("test-key")
//!     .progress_callback(Arc::new(AttemptCounter(AtomicU32::new(0))))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the summarisation client as it works through its attempts.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Attempt numbers are 1-indexed.
pub trait SummaryProgressCallback: Send + Sync {
    /// Called just before each HTTP request is sent.
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        let _ = (attempt, max_attempts);
    }

    /// Called when an attempt failed and another one will follow.
    ///
    /// # Arguments
    /// * `attempt`  — the attempt that just failed
    /// * `delay_ms` — backoff before the next attempt
    /// * `reason`   — human-readable failure of `attempt`
    fn on_retry_scheduled(&self, attempt: u32, delay_ms: u64, reason: &str) {
        let _ = (attempt, delay_ms, reason);
    }

    /// Called once when the summary text was received.
    fn on_success(&self, attempts: u32, markdown_len: usize) {
        let _ = (attempts, markdown_len);
    }

    /// Called once when the call failed for good.
    fn on_failure(&self, attempts: u32, error: &str) {
        let _ = (attempts, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SummaryProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SummarizeConfig`].
pub type ProgressCallback = Arc<dyn SummaryProgressCallback>;

/// Forwards every event to two callbacks, first then second.
pub struct TeeProgressCallback(pub ProgressCallback, pub ProgressCallback);

impl SummaryProgressCallback for TeeProgressCallback {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        self.0.on_attempt_start(attempt, max_attempts);
        self.1.on_attempt_start(attempt, max_attempts);
    }

    fn on_retry_scheduled(&self, attempt: u32, delay_ms: u64, reason: &str) {
        self.0.on_retry_scheduled(attempt, delay_ms, reason);
        self.1.on_retry_scheduled(attempt, delay_ms, reason);
    }

    fn on_success(&self, attempts: u32, markdown_len: usize) {
        self.0.on_success(attempts, markdown_len);
        self.1.on_success(attempts, markdown_len);
    }

    fn on_failure(&self, attempts: u32, error: &str) {
        self.0.on_failure(attempts, error);
        self.1.on_failure(attempts, error);
    }
}
