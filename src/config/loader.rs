//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Listen port.
pub const ENV_PORT: &str = "PORT";
/// Per-attempt read timeout in seconds.
pub const ENV_TIMEOUT: &str = "TIMEOUT";
/// Retries after the first failed attempt.
pub const ENV_RETRIES: &str = "RETRIES";
/// Shared secret.
pub const ENV_KEY: &str = "KEY";

/// Error type for configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid {var} value '{value}': expected a port number")]
    InvalidPort { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file into a configuration, without validating it.
pub fn read_config_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay the `PORT`, `TIMEOUT`, `RETRIES` and `KEY` variables.
///
/// `lookup` abstracts the environment so tests can supply their own values.
/// Unparseable `TIMEOUT` and `RETRIES` fall back to 0; an unparseable `PORT`
/// is fatal since nothing could be bound.
///
/// A set but empty `KEY` counts as unset: no secret, the gate stays open, and
/// a secret from the file is cleared. This differs on purpose from gating on
/// the variable merely being defined, where an empty `KEY` still rejects any
/// non-empty `PROXYKEY` while letting requests without one through.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup(ENV_PORT) {
        config.listener.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort {
            var: ENV_PORT,
            value: port.clone(),
        })?;
    }

    if let Some(timeout) = lookup(ENV_TIMEOUT) {
        config.upstream.read_timeout_secs = parse_or_zero(ENV_TIMEOUT, &timeout);
    }

    if let Some(retries) = lookup(ENV_RETRIES) {
        config.upstream.max_retries = parse_or_zero(ENV_RETRIES, &retries);
    }

    if let Some(key) = lookup(ENV_KEY) {
        config.security.shared_secret = (!key.is_empty()).then_some(key);
    }

    Ok(())
}

fn parse_or_zero<T>(var: &str, raw: &str) -> T
where
    T: std::str::FromStr + Default,
{
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(var, value = raw, "Unparseable value, using 0");
            T::default()
        }
    }
}

/// Apply environment overrides to an already-read config and validate it.
pub fn finish_config<F>(mut config: ProxyConfig, lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
