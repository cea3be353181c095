//! # edgequake-summarize
//!
//! Summarise PDF documents or pasted text into Markdown reports with Google
//! Gemini.
//!
//! The model does the reading; this crate assembles the request, talks to
//! the `generateContent` endpoint with bounded retry, and tidies the
//! returned Markdown.
//!
//! ## Pipeline Overview
//!
//! ```text
//! form / CLI flags
//!  │
//!  ├─ 1. Assemble  text or PDF (never both) + focus + target language
//!  ├─ 2. Load      local path or URL → base64 PDF   (upload mode only)
//!  ├─ 3. Payload   system instruction + one user turn
//!  ├─ 4. Call      POST with up to 5 attempts, 2^n s + jitter backoff
//!  ├─ 5. Polish    fence / preamble / whitespace clean-up
//!  └─ 6. Output    Markdown report + attempt stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_summarize::{summarize_text, Language, SummarizeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key read from GEMINI_API_KEY
//!     let config = SummarizeConfig::default();
//!     let summary = summarize_text(
//!         "Attention is all you need ...",
//!         "Focus on the training setup",
//!         Language::English,
//!         &config,
//!     )
//!     .await?;
//!     println!("{}", summary.markdown);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `summarize` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod form;
pub mod language;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod request;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{SummarizeConfig, SummarizeConfigBuilder, API_KEY_ENV};
pub use error::{AttemptError, SummarizeError};
pub use form::{update, Action, FileSlot, FormState, Phase};
pub use language::Language;
pub use output::{Summary, SummaryStats};
pub use pipeline::input::load_pdf;
pub use pipeline::retry::{decide_next_action, NextAction, RetryPolicy};
pub use pipeline::transport::{HttpTransport, Transport, TransportResponse};
pub use progress::{
    NoopProgressCallback, ProgressCallback, SummaryProgressCallback, TeeProgressCallback,
};
pub use request::{assemble, InputKind, InputMode, PdfAttachment, RequestContent, SummaryRequest};
pub use summarize::{summarize_pdf, summarize_text, summarize_to_file, write_summary, Summarizer};
