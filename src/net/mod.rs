//! Network subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarding engine
//!     → client.rs (Dispatch trait, pooled HTTPS client)
//!     → https://<service>.<parent-domain>/...
//! ```
//!
//! # Design Decisions
//! - Inbound connections are owned by axum/hyper; this module only covers
//!   the outbound leg
//! - The dispatch capability is a trait so tests can count and script calls

pub mod client;

pub use client::{Dispatch, HttpsDispatcher, TransportError};
