//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and formats (domain, secret, addresses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::HeaderValue;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check a parsed configuration for values that would break request handling.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let domain = &config.upstream.parent_domain;
    if domain.is_empty() {
        errors.push(ValidationError::new("upstream.parent_domain", "must not be empty"));
    } else if domain.contains(['/', ':']) || domain.starts_with('.') || domain.ends_with('.') {
        errors.push(ValidationError::new(
            "upstream.parent_domain",
            format!("'{}' must be a bare host name", domain),
        ));
    }

    let prefix = &config.upstream.version_prefix;
    if prefix.is_empty() || prefix.contains('/') {
        errors.push(ValidationError::new(
            "upstream.version_prefix",
            "must be a single non-empty path segment",
        ));
    }

    if let Some(secret) = config.shared_secret() {
        if secret.is_empty() {
            errors.push(ValidationError::new("security.shared_secret", "must not be empty"));
        } else if HeaderValue::from_str(secret).is_err() {
            errors.push(ValidationError::new(
                "security.shared_secret",
                "must be a valid header value",
            ));
        }
    }

    if config.security.max_body_bytes == 0 {
        errors.push(ValidationError::new("security.max_body_bytes", "must be greater than 0"));
    }

    if let Some(Err(e)) = config.observability.metrics_socket_addr() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address: {}", e),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ProxyConfig::default();
        config.upstream.parent_domain = "https://roblox.com".into();
        config.upstream.version_prefix = "v1/beta".into();
        config.security.shared_secret = Some("bad\nsecret".into());
        config.observability.metrics_address = Some("not-an-addr".into());

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "upstream.parent_domain",
                "upstream.version_prefix",
                "security.shared_secret",
                "observability.metrics_address",
            ]
        );
    }

    #[test]
    fn test_metrics_address_accepted() {
        let mut config = ProxyConfig::default();
        config.observability.metrics_address = Some("127.0.0.1:9090".into());
        assert!(validate_config(&config).is_ok());
    }
}
