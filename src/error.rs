//! Error types for the edgequake-summarize library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`SummarizeError`] — **Fatal**: the summary cannot be produced (no
//!   input, bad PDF, missing API key, retries exhausted). Returned as
//!   `Err(SummarizeError)` from [`crate::Summarizer::try_summarize`] and the
//!   input loaders.
//!
//! * [`AttemptError`] — **Per attempt**: one HTTP round-trip failed
//!   (throttled, 5xx, network blip). The retry policy in
//!   [`crate::pipeline::retry`] decides whether another attempt follows or
//!   the failure is promoted to a [`SummarizeError`].
//!
//! Both render as human-readable strings, which is what the
//! string-returning [`crate::Summarizer::summarize`] hands back.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-summarize library.
#[derive(Debug, Error)]
pub enum SummarizeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Paste mode is active but the text is empty or whitespace-only.
    #[error("No text to summarise: paste some text first.")]
    EmptyText,

    /// Upload mode is active but no PDF has been fully read yet.
    #[error("No PDF selected: choose a PDF file and wait for it to finish loading.")]
    NoFileSelected,

    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file was read, but its content is not a PDF.
    #[error("File is not a valid PDF: '{name}'\nFirst bytes: {magic:?}")]
    NotAPdf { name: String, magic: Vec<u8> },

    /// The selected file does not carry the PDF media type.
    #[error("Only PDF files are accepted, '{name}' is {media_type}")]
    UnsupportedMediaType { name: String, media_type: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Config errors ─────────────────────────────────────────────────────
    /// No API key was configured and the environment variable is unset.
    #[error("Gemini API key is not configured.\nSet {var}=<your key> or pass one to the config builder.")]
    MissingApiKey { var: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    // ── API errors ────────────────────────────────────────────────────────
    /// Every attempt failed; carries the last attempt's failure.
    #[error("Summary failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        attempts: u32,
        last_error: AttemptError,
    },

    /// The API answered successfully but the body held no summary text.
    #[error("The API response did not contain any summary text: {detail}")]
    MalformedResponse { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a single request/response round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum AttemptError {
    /// HTTP 429 from the API.
    #[error("rate limited by the API (HTTP 429)")]
    RateLimited,

    /// Any other non-success HTTP status.
    #[error("API returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Connection, TLS or timeout failure before a status was received.
    #[error("network error: {0}")]
    Transport(String),

    /// A success status whose body was not valid JSON.
    #[error("could not decode API response: {0}")]
    Decode(String),

    /// Valid JSON lacking `candidates[0].content.parts[0].text`.
    #[error("response has no summary text ({0})")]
    Malformed(String),
}

impl AttemptError {
    /// Longest slice of an error body kept in messages.
    pub const MAX_BODY_CHARS: usize = 300;

    /// Build an [`AttemptError::HttpStatus`], truncating long bodies.
    pub fn http_status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let body = if body.chars().count() > Self::MAX_BODY_CHARS {
            let cut: String = body.chars().take(Self::MAX_BODY_CHARS).collect();
            format!("{cut}\u{2026}")
        } else {
            body.to_string()
        };
        AttemptError::HttpStatus { status, body }
    }
}
