//! Result types returned by a successful summarisation.

use crate::language::Language;
use crate::request::InputKind;
use serde::{Deserialize, Serialize};

/// A generated summary report plus statistics about how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The Markdown report.
    pub markdown: String,
    pub stats: SummaryStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Attempts used, including the successful one (1-indexed).
    pub attempts: u32,
    /// Wall-clock time across all attempts and backoff waits.
    pub duration_ms: u64,
    pub input_kind: InputKind,
    pub language: Language,
    pub model: String,
}
