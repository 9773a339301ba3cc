//! Error types for request handling.
//!
//! Every non-fatal failure a request can hit maps onto exactly one complete
//! HTTP response through [`IntoResponse`]. Upstream 4xx/5xx responses are not
//! represented here: they are relayed as received.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::net::client::TransportError;

/// Body sent with a 407 when the `PROXYKEY` check fails.
pub const AUTH_REJECTED_BODY: &str = "Missing or invalid PROXYKEY header.";

/// Body sent with a 400 when the path cannot be mapped to an upstream.
pub const MALFORMED_PATH_BODY: &str = "URL format invalid.";

/// Body sent with a 500 once every dispatch attempt has failed.
pub const UPSTREAM_FAILURE_BODY: &str = "Proxy failed to connect. Please try again.";

/// Errors that terminate a single proxied request.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("{}", AUTH_REJECTED_BODY)]
    AuthRejected,

    #[error("{}", MALFORMED_PATH_BODY)]
    MalformedPath,

    #[error("Request body too large.")]
    BodyTooLarge,

    #[error("Failed to read request body.")]
    BodyRead,

    #[error("upstream unreachable after {attempts} attempt(s): {last}")]
    UpstreamTransportFailure {
        attempts: u32,
        #[source]
        last: TransportError,
    },
}

impl ProxyError {
    /// Status code surfaced to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::AuthRejected => StatusCode::PROXY_AUTHENTICATION_REQUIRED,
            ProxyError::MalformedPath => StatusCode::BAD_REQUEST,
            ProxyError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::BodyRead => StatusCode::BAD_REQUEST,
            ProxyError::UpstreamTransportFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fixed plain-text body surfaced to the client.
    ///
    /// Transport details stay in the logs; the client only ever sees the
    /// generic failure text.
    pub fn body(&self) -> &'static str {
        match self {
            ProxyError::AuthRejected => AUTH_REJECTED_BODY,
            ProxyError::MalformedPath => MALFORMED_PATH_BODY,
            ProxyError::BodyTooLarge => "Request body too large.",
            ProxyError::BodyRead => "Failed to read request body.",
            ProxyError::UpstreamTransportFailure { .. } => UPSTREAM_FAILURE_BODY,
        }
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::AuthRejected => "auth_rejected",
            ProxyError::MalformedPath => "malformed_path",
            ProxyError::BodyTooLarge => "body_too_large",
            ProxyError::BodyRead => "body_read",
            ProxyError::UpstreamTransportFailure { .. } => "upstream_exhausted",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), self.body()).into_response()
    }
}

/// Result type alias for request handling.
pub type Result<T> = std::result::Result<T, ProxyError>;
