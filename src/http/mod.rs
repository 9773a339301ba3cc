//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, access gate, proxy handler)
//!     → [routing resolves the upstream]
//!     → request.rs (outbound request with rewritten headers, buffered body)
//!     → [resilience dispatches with retries]
//!     → response.rs (relay status, body, headers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::OutboundRequest;
pub use server::{AppState, HttpServer};
