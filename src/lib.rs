//! Authenticating reverse proxy that maps `/<service>/<path>` onto
//! `https://<service>.<parent-domain>/<path>`.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod security;

pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use net::client::{Dispatch, TransportError};
