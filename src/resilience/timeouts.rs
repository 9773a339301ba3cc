//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap a single upstream attempt with the configured read deadline
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the attempt future is dropped on expiry
//! - Timeout errors are distinct from other transport errors
//! - No deadline configured means the attempt runs until the transport gives up

use std::future::Future;
use std::time::Duration;

use crate::net::client::TransportError;

/// Run `attempt`, failing with [`TransportError::Timeout`] once `deadline` elapses.
pub async fn with_deadline<F, T>(deadline: Option<Duration>, attempt: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, attempt)
            .await
            .map_err(|_| TransportError::Timeout(limit))?,
        None => attempt.await,
    }
}
