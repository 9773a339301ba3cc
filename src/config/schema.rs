//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Upstream mapping, timeouts and retries.
    pub upstream: UpstreamConfig,

    /// Shared secret and request limits.
    pub security: SecurityConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl ProxyConfig {
    /// Whether a shared secret is configured.
    pub fn shared_secret(&self) -> Option<&str> {
        self.security.shared_secret.as_deref()
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port to listen on.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string handed to the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Upstream mapping and dispatch behaviour.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Parent domain every service subdomain hangs off.
    pub parent_domain: String,

    /// Leading path segment that marks the versioned-prefix shape.
    pub version_prefix: String,

    /// Per-attempt read timeout in seconds. Zero leaves attempts unbounded.
    pub read_timeout_secs: u64,

    /// Retries after the first failed attempt.
    pub max_retries: u32,

    /// Fixed delay between attempts in milliseconds.
    pub backoff_ms: u64,

    /// How long idle pooled connections are kept, in seconds.
    pub pool_idle_timeout_secs: u64,
}

impl UpstreamConfig {
    /// Per-attempt deadline, if one is configured.
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_secs > 0).then(|| Duration::from_secs(self.read_timeout_secs))
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            parent_domain: "roblox.com".to_string(),
            version_prefix: "v1".to_string(),
            read_timeout_secs: 0,
            max_retries: 0,
            backoff_ms: 100,
            pool_idle_timeout_secs: 60,
        }
    }
}

/// Security configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Shared secret checked against `PROXYKEY` and injected upstream.
    pub shared_secret: Option<String>,

    /// Maximum inbound body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            shared_secret: None,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Prometheus endpoint bind address. Metrics are not exported when unset.
    pub metrics_address: Option<String>,
}

impl ObservabilityConfig {
    pub fn metrics_socket_addr(&self) -> Option<Result<SocketAddr, std::net::AddrParseError>> {
        self.metrics_address.as_deref().map(str::parse::<SocketAddr>)
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_address: None,
        }
    }
}
