//! Target languages for the generated summary.
//!
//! The set is fixed reference data: five `(code, display name)` pairs. The
//! display name is what ends up in the translation directive sent to the
//! model, so it is spelled in English.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output language of the summary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "es")]
    Spanish,
}

impl Language {
    /// Every supported language, in menu order.
    pub const ALL: [Language; 5] = [
        Language::Korean,
        Language::English,
        Language::Chinese,
        Language::Japanese,
        Language::Spanish,
    ];

    /// Two-letter code, e.g. `"en"`.
    pub fn code(self) -> &'static str {
        match self {
            Language::Korean => "ko",
            Language::English => "en",
            Language::Chinese => "zh",
            Language::Japanese => "ja",
            Language::Spanish => "es",
        }
    }

    /// English display name, e.g. `"English"`.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::Korean => "Korean",
            Language::English => "English",
            Language::Chinese => "Chinese",
            Language::Japanese => "Japanese",
            Language::Spanish => "Spanish",
        }
    }

    /// Look up a language by its two-letter code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when a string names no supported language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language '{0}' (expected one of: ko, en, zh, ja, es)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    /// Accepts a code (`"ja"`) or a display name (`"Japanese"`), any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::from_code(s)
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|l| l.display_name().eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_languages_with_unique_codes() {
        let mut codes: Vec<_> = Language::ALL.iter().map(|l| l.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 5);
    }

    #[test]
    fn parse_code_and_name() {
        assert_eq!("en".parse::<Language>(), Ok(Language::English));
        assert_eq!("ZH".parse::<Language>(), Ok(Language::Chinese));
        assert_eq!("japanese".parse::<Language>(), Ok(Language::Japanese));
        assert_eq!(" es ".parse::<Language>(), Ok(Language::Spanish));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn serde_uses_codes() {
        let json = serde_json::to_string(&Language::Korean).unwrap();
        assert_eq!(json, "\"ko\"");
        let back: Language = serde_json::from_str("\"ja\"").unwrap();
        assert_eq!(back, Language::Japanese);
    }
}
