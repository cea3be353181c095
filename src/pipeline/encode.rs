//! PDF encoding: raw bytes → base64 [`PdfAttachment`].
//!
//! Gemini accepts documents inline as base64 inside the JSON body, tagged
//! with their media type. The magic bytes are checked here so a renamed
//! `.docx` is refused locally rather than by the API.

use crate::error::SummarizeError;
use crate::request::{PdfAttachment, PDF_MEDIA_TYPE};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Every PDF starts with these four bytes.
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Encode a PDF held in memory as an attachment ready for the API.
pub fn encode_pdf(name: impl Into<String>, bytes: &[u8]) -> Result<PdfAttachment, SummarizeError> {
    let name = name.into();
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(SummarizeError::NotAPdf {
            name,
            magic: bytes.iter().take(4).copied().collect(),
        });
    }

    let data_base64 = STANDARD.encode(bytes);
    debug!("Encoded '{}': {} bytes → {} bytes base64", name, bytes.len(), data_base64.len());

    Ok(PdfAttachment {
        name,
        media_type: PDF_MEDIA_TYPE.to_string(),
        data_base64,
        byte_len: bytes.len(),
    })
}
