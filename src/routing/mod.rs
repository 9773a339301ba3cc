//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path + query
//!     → resolver.rs (shape detection: versioned, then bare)
//!     → Return: ResolvedTarget or MalformedPath
//! ```
//!
//! # Design Decisions
//! - Resolver built once at startup, immutable at runtime
//! - Deterministic: same input always resolves to the same upstream
//! - Versioned shape is tried first

pub mod resolver;

pub use resolver::{PathShape, ResolvedTarget, Resolver};
