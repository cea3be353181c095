//! Pipeline stages for summarisation.
//!
//! Each submodule implements exactly one step, so each is independently
//! testable.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ payload ──▶ llm ⇄ retry ──▶ postprocess
//! (path/URL) (base64)  (JSON)      (HTTP + backoff)  (cleanup)
//! ```
//!
//! 1. [`input`]     — read a local path or download a URL, PDF only
//! 2. [`encode`]    — verify `%PDF` magic and base64-wrap the bytes
//! 3. [`payload`]   — Gemini `generateContent` request/response types
//! 4. [`llm`]       — the attempt loop; the only stage with network I/O,
//!    through [`transport`]
//! 5. [`retry`]     — pure backoff policy deciding retry/succeed/fail
//! 6. [`postprocess`] — deterministic text-cleanup rules for model quirks

pub mod encode;
pub mod input;
pub mod llm;
pub mod payload;
pub mod postprocess;
pub mod retry;
pub mod transport;
