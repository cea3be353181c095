//! HTTP transport seam.
//!
//! The retry loop talks to the API through [`Transport`] so it can be
//! driven by scripted responses in tests. [`HttpTransport`] is the
//! production implementation on top of `reqwest`.

use crate::error::{AttemptError, SummarizeError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends a JSON body and returns whatever status came back.
///
/// Implementations report a non-2xx status as `Ok`; `Err` is reserved for
/// failures where no response was received.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, AttemptError>;
}

/// `reqwest`-backed transport. The API key travels in the `key` query
/// parameter.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport; `timeout` of `None` keeps reqwest's default.
    pub fn new(timeout: Option<Duration>) -> Result<Self, SummarizeError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| SummarizeError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, AttemptError> {
        debug!("POST {}?key=<redacted>", url);
        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            // reqwest errors include the URL, and with it the key.
            .map_err(|e| AttemptError::Transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Transport(e.without_url().to_string()))?;
        Ok(TransportResponse { status, body })
    }
}
