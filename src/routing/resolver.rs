//! Path-to-upstream resolution.
//!
//! # Responsibilities
//! - Recognize the versioned (`/v1/<service>/<rest>`) and bare
//!   (`/<service>/<rest>`) path shapes
//! - Build the `https://<service>.<parent-domain>/<rest>[?<query>]` target
//! - Reject anything else as a malformed path
//!
//! # Design Decisions
//! - Pure function of (path, query, config); no I/O
//! - No allow-list: any well-shaped path is proxied to the matching subdomain
//! - The remainder and query are carried verbatim, never re-escaped

use axum::http::Uri;

use crate::config::UpstreamConfig;
use crate::error::{ProxyError, Result};

/// Which path shape produced a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathShape {
    /// `/<marker>/<service>/<rest>`
    Versioned,
    /// `/<service>/<rest>`
    Bare,
}

/// Where a request is forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    service: String,
    remainder: String,
    shape: PathShape,
    uri: Uri,
}

impl ResolvedTarget {
    /// Subdomain label the request is routed to.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Path after the service segment, with `?<query>` appended when present.
    pub fn remainder(&self) -> &str {
        &self.remainder
    }

    pub fn shape(&self) -> PathShape {
        self.shape
    }

    /// Absolute upstream URL.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }
}

/// Stateless resolver bound to the upstream mapping settings.
#[derive(Debug, Clone)]
pub struct Resolver {
    parent_domain: String,
    version_prefix: String,
}

impl Resolver {
    pub fn new(parent_domain: impl Into<String>, version_prefix: impl Into<String>) -> Self {
        Self {
            parent_domain: parent_domain.into(),
            version_prefix: version_prefix.into(),
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(config.parent_domain.clone(), config.version_prefix.clone())
    }

    /// Resolve an inbound path and query into an upstream target.
    pub fn resolve(&self, path: &str, query: Option<&str>) -> Result<ResolvedTarget> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let parts: Vec<&str> = trimmed.splitn(3, '/').collect();

        let (shape, service, rest) = match parts.as_slice() {
            [marker, service, rest] if *marker == self.version_prefix => {
                (PathShape::Versioned, *service, (*rest).to_string())
            }
            [service, first, rest @ ..] => {
                let rest = match rest.first() {
                    Some(tail) => format!("{}/{}", first, tail),
                    None => (*first).to_string(),
                };
                (PathShape::Bare, *service, rest)
            }
            _ => return Err(ProxyError::MalformedPath),
        };

        if service.is_empty() || rest.is_empty() {
            return Err(ProxyError::MalformedPath);
        }

        let mut remainder = rest;
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            remainder.push('?');
            remainder.push_str(query);
        }

        let uri: Uri = format!("https://{}.{}/{}", service, self.parent_domain, remainder)
            .parse()
            .map_err(|_| ProxyError::MalformedPath)?;

        Ok(ResolvedTarget {
            service: service.to_string(),
            remainder,
            shape,
            uri,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> Resolver {
        Resolver::new("roblox.com", "v1")
    }

    #[test]
    fn test_bare_shape() {
        let target = resolver().resolve("/users/123/username-history", None).unwrap();
        assert_eq!(target.shape(), PathShape::Bare);
        assert_eq!(target.service(), "users");
        assert_eq!(target.remainder(), "123/username-history");
        assert_eq!(target.uri().to_string(), "https://users.roblox.com/123/username-history");
    }

    #[test]
    fn test_bare_shape_with_query() {
        let target = resolver()
            .resolve("/users/123/username-history", Some("limit=10"))
            .unwrap();
        assert_eq!(target.remainder(), "123/username-history?limit=10");
        assert_eq!(
            target.uri().to_string(),
            "https://users.roblox.com/123/username-history?limit=10"
        );
    }

    #[test]
    fn test_versioned_shape_uses_second_segment() {
        let target = resolver().resolve("/v1/games/456/servers", None).unwrap();
        assert_eq!(target.shape(), PathShape::Versioned);
        assert_eq!(target.service(), "games");
        assert_eq!(target.remainder(), "456/servers");
        assert_eq!(target.uri().to_string(), "https://games.roblox.com/456/servers");
    }

    #[test]
    fn test_marker_with_two_segments_falls_back_to_bare() {
        let target = resolver().resolve("/v1/users", None).unwrap();
        assert_eq!(target.shape(), PathShape::Bare);
        assert_eq!(target.service(), "v1");
        assert_eq!(target.remainder(), "users");
    }

    #[test]
    fn test_custom_marker() {
        let target = Resolver::new("example.org", "v2")
            .resolve("/v2/catalog/items", Some("a=1&b=2"))
            .unwrap();
        assert_eq!(target.uri().to_string(), "https://catalog.example.org/items?a=1&b=2");
    }

    #[test]
    fn test_too_few_segments() {
        for path in ["/", "", "/users", "users"] {
            assert!(
                matches!(resolver().resolve(path, None), Err(ProxyError::MalformedPath)),
                "{path} should be malformed"
            );
        }
    }

    #[test]
    fn test_empty_service_or_remainder() {
        for path in ["//123", "/users/", "/v1//x", "/v1/users/"] {
            assert!(
                matches!(resolver().resolve(path, None), Err(ProxyError::MalformedPath)),
                "{path} should be malformed"
            );
        }
    }

    #[test]
    fn test_empty_query_is_ignored() {
        let target = resolver().resolve("/users/1", Some("")).unwrap();
        assert_eq!(target.remainder(), "1");
    }

    #[test]
    fn test_inner_slashes_kept_verbatim() {
        let target = resolver().resolve("/thumbnails/a//b/", None).unwrap();
        assert_eq!(target.remainder(), "a//b/");
    }

    #[test]
    fn test_unparseable_host_is_malformed() {
        let result = resolver().resolve("/bad host/x", None);
        assert!(matches!(result, Err(ProxyError::MalformedPath)));
    }
}
