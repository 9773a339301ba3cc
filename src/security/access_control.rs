//! Shared-secret access gate.
//! Rejects requests whose `PROXYKEY` header does not carry the configured secret.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::{ProxyError, Result};
use crate::observability::metrics;
use crate::security::headers::PROXY_KEY;

/// Gate state: the secret, or nothing when the gate is open.
#[derive(Clone, Debug)]
pub struct AccessGate {
    secret: Option<HeaderValue>,
}

impl AccessGate {
    pub fn new(secret: Option<HeaderValue>) -> Self {
        Self { secret }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Byte-for-byte comparison of `PROXYKEY` against the secret.
    pub fn check(&self, headers: &HeaderMap) -> Result<()> {
        let Some(secret) = &self.secret else {
            return Ok(());
        };

        match headers.get(PROXY_KEY) {
            Some(presented) if presented.as_bytes() == secret.as_bytes() => Ok(()),
            _ => Err(ProxyError::AuthRejected),
        }
    }
}

pub async fn access_control_middleware(
    State(gate): State<AccessGate>,
    req: Request<Body>,
    next: Next,
) -> Response {
    // 1. No secret configured: passthrough mode.
    if !gate.is_enabled() {
        return next.run(req).await;
    }

    // 2. Reject before any routing or upstream work happens.
    if let Err(e) = gate.check(req.headers()) {
        tracing::debug!(method = %req.method(), path = %req.uri().path(), "Rejected: bad PROXYKEY");
        metrics::record_auth_rejection();
        return e.into_response();
    }

    next.run(req).await
}
