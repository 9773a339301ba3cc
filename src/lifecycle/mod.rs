//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Read config → Init logging → Env overrides + validate → Init metrics → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: a config or bind error is fatal
//! - The listener binds last so traffic only arrives once everything is ready

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
