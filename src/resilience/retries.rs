//! Retry logic.
//!
//! # Responsibilities
//! - Dispatch the outbound request, bounded by the per-attempt deadline
//! - Retry transport failures with a fixed backoff, up to `max_retries` times
//! - Hand back the first HTTP response received, whatever its status
//!
//! # Design Decisions
//! - `max_retries = N` means at most N + 1 attempts; 0 disables retrying
//! - 4xx/5xx are answers, not failures: never retried
//! - Dropping the returned future abandons the in-flight attempt or backoff

use std::time::Duration;

use axum::http::Response;
use bytes::Bytes;

use crate::config::UpstreamConfig;
use crate::error::{ProxyError, Result};
use crate::http::request::OutboundRequest;
use crate::net::client::Dispatch;
use crate::observability::metrics;
use crate::resilience::backoff::FixedBackoff;
use crate::resilience::timeouts::with_deadline;

/// Bounds for the dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub read_timeout: Option<Duration>,
    pub backoff: FixedBackoff,
}

impl RetryPolicy {
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            read_timeout: config.read_timeout(),
            backoff: FixedBackoff::new(config.backoff()),
        }
    }

    /// Upper bound on dispatch attempts for one request.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&UpstreamConfig::default())
    }
}

/// Deliver `outbound` through `dispatcher`, retrying transport failures.
///
/// Returns the upstream response untouched, or
/// [`ProxyError::UpstreamTransportFailure`] once every attempt has failed.
pub async fn forward(
    dispatcher: &dyn Dispatch,
    policy: &RetryPolicy,
    outbound: &OutboundRequest,
    service: &str,
) -> Result<Response<Bytes>> {
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        metrics::record_attempt();

        let attempt_fut = dispatcher.dispatch(outbound.to_request());
        let result = with_deadline(policy.read_timeout, attempt_fut).await;

        match result {
            Ok(response) => {
                tracing::debug!(
                    service,
                    attempt,
                    status = %response.status(),
                    uri = %outbound.uri(),
                    "Upstream responded"
                );
                return Ok(response);
            }
            Err(e) if attempt < policy.max_attempts() => {
                tracing::warn!(
                    service,
                    attempt,
                    delay = ?policy.backoff.delay(),
                    uri = %outbound.uri(),
                    error = %e,
                    "Upstream transport failure, retrying"
                );
                metrics::record_retry();
                policy.backoff.wait().await;
            }
            Err(e) => {
                tracing::error!(
                    service,
                    attempts = attempt,
                    uri = %outbound.uri(),
                    error = %e,
                    "Upstream unreachable, giving up"
                );
                metrics::record_exhausted();
                return Err(ProxyError::UpstreamTransportFailure {
                    attempts: attempt,
                    last: e,
                });
            }
        }
    }
}
