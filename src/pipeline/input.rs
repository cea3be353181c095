//! Input loading: read a user-supplied path or URL into a [`PdfAttachment`].
//!
//! This is the "file selection + read" step of upload mode. Selection is
//! restricted to PDFs: a file whose media type (or, for local paths, file
//! extension) is not PDF never registers. The `%PDF` magic bytes are then
//! verified by [`crate::pipeline::encode::encode_pdf`].

use crate::error::SummarizeError;
use crate::pipeline::encode::encode_pdf;
use crate::request::{accepts_selection, PdfAttachment};
use std::path::Path;
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Load a PDF from a local path or an HTTP/HTTPS URL.
pub async fn load_pdf(input: &str, timeout_secs: u64) -> Result<PdfAttachment, SummarizeError> {
    if is_url(input) {
        download_pdf(input, timeout_secs).await
    } else {
        read_local(Path::new(input)).await
    }
}

/// Read a local PDF, validating its extension and magic bytes.
pub async fn read_local(path: &Path) -> Result<PdfAttachment, SummarizeError> {
    let name = file_name(path);
    if !accepts_selection(&name, None) {
        return Err(SummarizeError::UnsupportedMediaType {
            name,
            media_type: "a non-PDF file".into(),
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => SummarizeError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => SummarizeError::FileNotFound {
            path: path.to_path_buf(),
        },
    })?;

    debug!("Read local PDF: {} ({} bytes)", path.display(), bytes.len());
    encode_pdf(name, &bytes)
}

/// Download a URL into memory and encode it.
async fn download_pdf(url: &str, timeout_secs: u64) -> Result<PdfAttachment, SummarizeError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SummarizeError::HttpClient(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            SummarizeError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            SummarizeError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(SummarizeError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let name = filename_from_url(url);
    let media_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    // Generic binary types say nothing about the content; the magic check decides.
    if let Some(mt) = media_type
        .as_deref()
        .filter(|m| !m.starts_with("application/octet-stream"))
    {
        if !accepts_selection(&name, Some(mt)) {
            return Err(SummarizeError::UnsupportedMediaType {
                name,
                media_type: mt.to_string(),
            });
        }
    }

    let bytes = response.bytes().await.map_err(|e| SummarizeError::DownloadFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    info!("Downloaded {} bytes from {}", bytes.len(), url);
    encode_pdf(name, &bytes)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Last path segment of a URL, or `downloaded.pdf`.
fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() {
                    return last.to_string();
                }
            }
        }
    }
    "downloaded.pdf".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(filename_from_url("https://arxiv.org/pdf/1706.03762"), "1706.03762");
        assert_eq!(filename_from_url("https://x.org/a/paper.pdf?dl=1"), "paper.pdf");
        assert_eq!(filename_from_url("https://x.org/"), "downloaded.pdf");
    }

    #[tokio::test]
    async fn read_local_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.pdf");
        std::fs::write(&path, b"%PDF-1.7\nbody\n%%EOF").unwrap();

        let att = read_local(&path).await.expect("should load");
        assert_eq!(att.name, "paper.pdf");
        assert_eq!(att.byte_len, 19);
    }

    #[tokio::test]
    async fn read_local_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let err = read_local(&path).await.unwrap_err();
        assert!(matches!(err, SummarizeError::UnsupportedMediaType { .. }));
    }

    #[tokio::test]
    async fn read_local_missing_file() {
        let err = read_local(Path::new("/definitely/not/here.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizeError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn read_local_checks_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"hello world").unwrap();

        let err = read_local(&path).await.unwrap_err();
        assert!(matches!(err, SummarizeError::NotAPdf { .. }));
    }
}
