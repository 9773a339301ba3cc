//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → access_control.rs (PROXYKEY check, 407 on mismatch)
//!     → Pass to routing
//!
//! Outbound request:
//!     → headers.rs (copy, pin Accept / PROXYKEY / User-Agent, drop Roblox-Id)
//! ```
//!
//! # Design Decisions
//! - Fail closed: a configured secret rejects anything that does not match
//! - The gate runs before routing so rejected requests never reach an upstream
//! - No trust in client input: proxy-owned headers always win

pub mod access_control;
pub mod headers;

pub use access_control::{access_control_middleware, AccessGate};
