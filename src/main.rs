//! roproxy
//!
//! Single-hop authenticating reverse proxy built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                     roproxy                      │
//!   Client Request       │  ┌──────────┐   ┌──────────┐   ┌──────────────┐  │
//!   ─────────────────────┼─▶│  access  │──▶│ routing  │──▶│   request    │  │
//!     PROXYKEY: ...      │  │   gate   │   │ resolver │   │  (headers)   │  │
//!                        │  └────┬─────┘   └────┬─────┘   └──────┬───────┘  │
//!                        │       │ 407          │ 400            ▼          │
//!                        │       │              │         ┌──────────────┐  │   https://<service>
//!                        │       │              │         │ retry loop + │──┼──▶ .<parent-domain>/...
//!                        │       │              │         │ HTTPS client │◀─┼───
//!                        │       ▼              ▼         └──────┬───────┘  │
//!   Client Response      │  ┌────────────────────────────┐       │ 500 when │
//!   ◀────────────────────┼──│      response relay        │◀──────┘ exhausted│
//!                        │  └────────────────────────────┘                  │
//!                        └──────────────────────────────────────────────────┘
//! ```
//!
//! Configuration comes from an optional TOML file overlaid with the `PORT`,
//! `TIMEOUT`, `RETRIES` and `KEY` environment variables.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use roproxy::config::{finish_config, read_config_file, ProxyConfig};
use roproxy::lifecycle::{signals, Shutdown};
use roproxy::observability::{logging, metrics};
use roproxy::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "roproxy", version, about = "Authenticating subdomain reverse proxy")]
struct Cli {
    /// TOML configuration file; environment variables override its values.
    #[arg(short, long, env = "ROPROXY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let base = match cli.config.as_deref() {
        Some(path) => read_config_file(path)?,
        None => ProxyConfig::default(),
    };

    // Logging settings only come from the file, so the subscriber can be
    // installed before env overrides emit their warnings.
    logging::init_logging(&base.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "roproxy starting");

    let config = finish_config(base, |key| std::env::var(key).ok()).inspect_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
    })?;

    tracing::info!(
        port = config.listener.port,
        read_timeout_secs = config.upstream.read_timeout_secs,
        max_retries = config.upstream.max_retries,
        parent_domain = %config.upstream.parent_domain,
        auth_enabled = config.shared_secret().is_some(),
        "Configuration loaded"
    );

    if let Some(Ok(addr)) = config.observability.metrics_socket_addr() {
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(error = %e, "Failed to start metrics exporter");
        }
    }

    let bind_address = config.listener.bind_address();
    let listener = TcpListener::bind(&bind_address).await.inspect_err(|e| {
        tracing::error!(address = %bind_address, error = %e, "Failed to bind listener");
    })?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
