//! Upstream transport
//!
//! The single seam through which the proxy talks to the network. Production
//! uses [`HttpTransport`]; tests swap in their own implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{ProxyError, Result};

/// Raw upstream answer before any status or body checks.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs HTTP GET requests against upstream APIs.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `GET url?params` and returns whatever the upstream answered.
    ///
    /// Only failures to obtain a response at all (connection refused, DNS,
    /// timeout) are errors here, reported as [`ProxyError::Transport`].
    async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<UpstreamResponse>;
}

// == HTTP Transport ==
/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProxyError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<UpstreamResponse> {
        debug!(url, "sending upstream request");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(UpstreamResponse::new(status, body.to_vec()))
    }
}

// Error text must never carry the request URL: its query holds the FRED api_key.
fn transport_error(err: reqwest::Error) -> ProxyError {
    let err = err.without_url();
    if err.is_timeout() {
        ProxyError::Transport(format!("upstream request timed out: {}", err))
    } else {
        ProxyError::Transport(err.to_string())
    }
}
