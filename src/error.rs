//! Error types for the proxy
//!
//! Every failure a request can hit is a `ProxyError`; handlers return it and
//! axum turns it into a JSON error body with the matching status code.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Proxy Error Enum ==
/// Unified error type for the proxy.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Client supplied a bad query parameter or body
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A configuration value the route needs is missing
    #[error("Configuration error: {0}")]
    ClientConfig(String),

    /// Upstream could not be reached (connection failure, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-success status
    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamHttp { status: u16, url: String },

    /// Upstream body is not valid JSON
    #[error("Upstream returned malformed JSON: {0}")]
    UpstreamFormat(String),

    /// Upstream JSON parsed but has an unexpected structure
    #[error("Unexpected upstream response shape: {0}")]
    UpstreamShape(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    // == Status Code ==
    /// HTTP status the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidRequest(_) | ProxyError::ClientConfig(_) => {
                StatusCode::BAD_REQUEST
            }
            ProxyError::Transport(_)
            | ProxyError::UpstreamHttp { .. }
            | ProxyError::UpstreamFormat(_)
            | ProxyError::UpstreamShape(_) => StatusCode::BAD_GATEWAY,
            ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // == Unfetchable URL ==
    /// Reclassifies reachability failures as client errors.
    ///
    /// Used by routes where the caller picks the upstream URL: a URL that
    /// cannot be fetched is bad input, while a body that fetched fine but is
    /// not JSON stays a gateway error.
    pub fn into_unfetchable_url(self) -> Self {
        match self {
            ProxyError::Transport(_) | ProxyError::UpstreamHttp { .. } => {
                ProxyError::InvalidRequest(format!("Failed to fetch data: {}", self))
            }
            other => other,
        }
    }
}

// == Extractor Rejections ==
impl From<QueryRejection> for ProxyError {
    fn from(rejection: QueryRejection) -> Self {
        ProxyError::InvalidRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ProxyError {
    fn from(rejection: JsonRejection) -> Self {
        ProxyError::InvalidRequest(rejection.body_text())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
