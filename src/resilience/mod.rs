//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (per-attempt read deadline)
//!     → On transport failure: retries.rs (retry with fixed backoff, bounded)
//!     → Exhausted: synthesized 500
//! ```
//!
//! # Design Decisions
//! - Only transport failures are retried; any HTTP status is a final answer
//! - Retry loop is iterative so every suspension point is explicit
//! - Worst case per request is (max_retries + 1) × (read timeout + backoff)

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use backoff::FixedBackoff;
pub use retries::{forward, RetryPolicy};
