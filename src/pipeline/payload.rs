//! Gemini `generateContent` wire types.
//!
//! Request:
//! `{ contents: [{ parts: [...] }], systemInstruction: { parts: [{ text }] } }`
//! where each part is either `{ text }` or `{ inlineData: { mimeType, data } }`.
//!
//! Response: `{ candidates: [{ content: { parts: [{ text }] } }] }`. Every
//! level is optional on the way in, so a body with the wrong shape still
//! decodes and [`GenerateContentResponse::first_text`] reports what was
//! missing.

use crate::prompts::text_turn;
use crate::request::{RequestContent, SummaryRequest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: SystemInstruction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl GenerateContentRequest {
    /// Build the payload for `request` with the given system prompt.
    ///
    /// Text mode sends one part: the instruction followed by the pasted text
    /// between start/end markers. PDF mode sends the instruction, then the
    /// document as inline data.
    pub fn build(request: &SummaryRequest, system_prompt: &str) -> Self {
        let instruction = request.instruction();
        let parts = match request.content() {
            RequestContent::Text(text) => vec![Part::Text {
                text: text_turn(&instruction, text),
            }],
            RequestContent::Pdf(pdf) => vec![
                Part::Text { text: instruction },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: pdf.media_type.clone(),
                        data: pdf.data_base64.clone(),
                    },
                },
            ],
        };

        Self {
            contents: vec![Content { parts }],
            system_instruction: SystemInstruction {
                parts: vec![Part::Text {
                    text: system_prompt.to_string(),
                }],
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if present and non-blank.
    ///
    /// The error names the first missing level, plus the finish reason when
    /// the API gave one (e.g. `SAFETY`).
    pub fn first_text(&self) -> Result<&str, String> {
        let candidate = self
            .candidates
            .as_deref()
            .and_then(|c| c.first())
            .ok_or_else(|| "no candidates".to_string())?;
        let with_reason = |what: &str| match &candidate.finish_reason {
            Some(reason) => format!("{what}, finish reason {reason}"),
            None => what.to_string(),
        };
        let part = candidate
            .content
            .as_ref()
            .and_then(|c| c.parts.as_deref())
            .and_then(|p| p.first())
            .ok_or_else(|| with_reason("candidate has no content parts"))?;
        match part.text.as_deref() {
            Some(t) if !t.trim().is_empty() => Ok(t),
            Some(_) => Err(with_reason("first part text is empty")),
            None => Err(with_reason("first part has no text")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::request::{PdfAttachment, PDF_MEDIA_TYPE};
    use serde_json::json;

    #[test]
    fn text_payload_shape() {
        let req = SummaryRequest::from_text("Lorem ipsum...", "", Language::English).unwrap();
        let v = serde_json::to_value(GenerateContentRequest::build(&req, "SYS")).unwrap();
        assert_eq!(v["systemInstruction"]["parts"][0]["text"], "SYS");
        let parts = v["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 1);
        let text = parts[0]["text"].as_str().unwrap();
        assert!(text.starts_with("Translate the final summary into English.\n\n--- START OF TEXT ---"));
        assert!(text.ends_with("Lorem ipsum...\n--- END OF TEXT ---"));
    }

    #[test]
    fn pdf_payload_shape() {
        let pdf = PdfAttachment {
            name: "p.pdf".into(),
            media_type: PDF_MEDIA_TYPE.into(),
            data_base64: "JVBERi0xLjQ=".into(),
            byte_len: 8,
        };
        let req = SummaryRequest::from_pdf(pdf, "Focus on results", Language::Japanese);
        let v = serde_json::to_value(GenerateContentRequest::build(&req, "SYS")).unwrap();
        assert_eq!(
            v["contents"][0]["parts"],
            json!([
                { "text": "Focus on results\n\nTranslate the final summary into Japanese." },
                { "inlineData": { "mimeType": "application/pdf", "data": "JVBERi0xLjQ=" } }
            ])
        );
    }

    #[test]
    fn first_text_happy_path() {
        let body = r##"{"candidates":[{"content":{"parts":[{"text":"# Report"}]},"finishReason":"STOP"}]}"##;
        let resp: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.first_text(), Ok("# Report"));
    }

    #[test]
    fn first_text_reports_missing_levels() {
        let cases = [
            (r#"{}"#, "no candidates"),
            (r#"{"candidates":[]}"#, "no candidates"),
            (r#"{"candidates":[{"finishReason":"SAFETY"}]}"#, "finish reason SAFETY"),
            (r#"{"candidates":[{"content":{"parts":[{}]}}]}"#, "no text"),
            (r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#, "empty"),
        ];
        for (body, expected) in cases {
            let resp: GenerateContentResponse = serde_json::from_str(body).unwrap();
            let err = resp.first_text().unwrap_err();
            assert!(err.contains(expected), "{body}: got {err}");
        }
    }
}
