//! Input assembly: turn form values into a [`SummaryRequest`].
//!
//! A request carries exactly one kind of content. [`RequestContent`] is an
//! enum, so "text and file" or "neither" cannot be represented; the only
//! remaining check is that pasted text is not blank.

use crate::error::SummarizeError;
use crate::language::Language;
use crate::prompts::compose_instruction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The only media type accepted for uploads.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Which of the two input surfaces is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// A PDF file read into memory.
    #[default]
    Upload,
    /// Free text pasted by the user.
    Paste,
}

/// A PDF fully read into memory and base64-encoded.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfAttachment {
    /// File name as selected by the user (no directories).
    pub name: String,
    /// Always [`PDF_MEDIA_TYPE`].
    pub media_type: String,
    /// Standard base64 of the file bytes.
    pub data_base64: String,
    /// Size of the decoded file in bytes.
    pub byte_len: usize,
}

impl fmt::Debug for PdfAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfAttachment")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("byte_len", &self.byte_len)
            .finish_non_exhaustive()
    }
}

/// Content of a request: pasted text or a PDF, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestContent {
    Text(String),
    Pdf(PdfAttachment),
}

/// Coarse kind of input, reported in [`crate::output::SummaryStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Pdf,
}

/// One summarisation request, built fresh for every submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    content: RequestContent,
    focus_instruction: String,
    language: Language,
}

impl SummaryRequest {
    /// Build a paste-mode request. Refuses blank text.
    pub fn from_text(
        text: impl Into<String>,
        focus_instruction: impl Into<String>,
        language: Language,
    ) -> Result<Self, SummarizeError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SummarizeError::EmptyText);
        }
        Ok(Self {
            content: RequestContent::Text(text),
            focus_instruction: focus_instruction.into(),
            language,
        })
    }

    /// Build an upload-mode request from a loaded PDF.
    pub fn from_pdf(
        pdf: PdfAttachment,
        focus_instruction: impl Into<String>,
        language: Language,
    ) -> Self {
        Self {
            content: RequestContent::Pdf(pdf),
            focus_instruction: focus_instruction.into(),
            language,
        }
    }

    pub fn content(&self) -> &RequestContent {
        &self.content
    }

    pub fn focus_instruction(&self) -> &str {
        &self.focus_instruction
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn input_kind(&self) -> InputKind {
        match self.content {
            RequestContent::Text(_) => InputKind::Text,
            RequestContent::Pdf(_) => InputKind::Pdf,
        }
    }

    /// The natural-language instruction: focus (if any) plus the
    /// translation directive for [`Self::language`].
    pub fn instruction(&self) -> String {
        compose_instruction(&self.focus_instruction, self.language)
    }
}

/// Assemble a request from the active mode and current field values.
///
/// Refuses with [`SummarizeError::EmptyText`] in paste mode when `text` is
/// blank, and with [`SummarizeError::NoFileSelected`] in upload mode when
/// no file has been fully read. The inactive field is ignored.
pub fn assemble(
    mode: InputMode,
    text: &str,
    file: Option<&PdfAttachment>,
    focus_instruction: &str,
    language: Language,
) -> Result<SummaryRequest, SummarizeError> {
    match mode {
        InputMode::Paste => SummaryRequest::from_text(text, focus_instruction, language),
        InputMode::Upload => file
            .cloned()
            .map(|pdf| SummaryRequest::from_pdf(pdf, focus_instruction, language))
            .ok_or(SummarizeError::NoFileSelected),
    }
}

/// Whether a file selection may register as an upload.
///
/// With a known media type only `application/pdf` is accepted (parameters
/// such as `; charset=` are ignored). Without one, the `.pdf` extension
/// decides.
pub fn accepts_selection(name: &str, media_type: Option<&str>) -> bool {
    match media_type.map(str::trim).filter(|m| !m.is_empty()) {
        Some(mt) => {
            let essence = mt.split(';').next().unwrap_or(mt).trim();
            essence.eq_ignore_ascii_case(PDF_MEDIA_TYPE)
        }
        None => name.to_ascii_lowercase().ends_with(".pdf"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf() -> PdfAttachment {
        PdfAttachment {
            name: "paper.pdf".into(),
            media_type: PDF_MEDIA_TYPE.into(),
            data_base64: "JVBERi0=".into(),
            byte_len: 5,
        }
    }

    #[test]
    fn paste_mode_requires_text() {
        let err = assemble(InputMode::Paste, "  \n\t", None, "", Language::English).unwrap_err();
        assert!(matches!(err, SummarizeError::EmptyText));
    }

    #[test]
    fn upload_mode_requires_loaded_file() {
        let err = assemble(InputMode::Upload, "ignored", None, "", Language::English).unwrap_err();
        assert!(matches!(err, SummarizeError::NoFileSelected));
    }

    #[test]
    fn paste_mode_ignores_loaded_file() {
        let file = pdf();
        let req = assemble(InputMode::Paste, "hello", Some(&file), "", Language::Korean).unwrap();
        assert_eq!(req.content(), &RequestContent::Text("hello".into()));
        assert_eq!(req.input_kind(), InputKind::Text);
    }

    #[test]
    fn upload_mode_ignores_text() {
        let file = pdf();
        let req = assemble(InputMode::Upload, "typed", Some(&file), "", Language::Korean).unwrap();
        assert_eq!(req.content(), &RequestContent::Pdf(file));
    }

    #[test]
    fn instruction_always_names_language() {
        for lang in Language::ALL {
            let req = SummaryRequest::from_text("Lorem ipsum", "methods only", lang).unwrap();
            assert!(req.instruction().contains(lang.display_name()));
        }
    }

    #[test]
    fn selection_accepts_only_pdf() {
        assert!(accepts_selection("a.pdf", Some("application/pdf")));
        assert!(accepts_selection("a.bin", Some("Application/PDF; x=y")));
        assert!(accepts_selection("A.PDF", None));
        assert!(!accepts_selection("a.pdf", Some("text/plain")));
        assert!(!accepts_selection("a.docx", None));
        assert!(!accepts_selection("a.docx", Some("")));
    }

    #[test]
    fn attachment_debug_hides_payload() {
        let dbg = format!("{:?}", pdf());
        assert!(dbg.contains("paper.pdf"));
        assert!(!dbg.contains("JVBERi0="));
    }
}
