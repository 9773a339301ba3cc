//! Request handling and transformation.
//!
//! # Responsibilities
//! - Capture the parts of an inbound request that get forwarded
//! - Prepare a fresh outbound request for every upstream attempt
//!
//! # Design Decisions
//! - The body is buffered once so every retry sends identical bytes
//! - Headers are transformed once; attempts clone the finished set

use axum::http::{request::Parts, HeaderMap, HeaderValue, Method, Request, Uri};
use bytes::Bytes;

use crate::routing::ResolvedTarget;
use crate::security::headers::transform_request_headers;

/// Everything needed to rebuild the outbound request for each attempt.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl OutboundRequest {
    /// Mirror the inbound method and body towards `target`, with headers
    /// rewritten for the upstream hop.
    pub fn new(
        parts: &Parts,
        body: Bytes,
        target: &ResolvedTarget,
        secret: Option<&HeaderValue>,
    ) -> Self {
        Self {
            method: parts.method.clone(),
            uri: target.uri().clone(),
            headers: transform_request_headers(&parts.headers, secret),
            body,
        }
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Build the request for one attempt.
    pub fn to_request(&self) -> Request<Bytes> {
        let mut request = Request::new(self.body.clone());
        *request.method_mut() = self.method.clone();
        *request.uri_mut() = self.uri.clone();
        *request.headers_mut() = self.headers.clone();
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Resolver;
    use axum::http::header;

    #[test]
    fn test_outbound_mirrors_method_and_body() {
        let (parts, ()) = Request::builder()
            .method(Method::POST)
            .uri("/groups/7/wall?cursor=x")
            .header(header::CONTENT_TYPE, "application/json")
            .header("roblox-id", "9")
            .body(())
            .unwrap()
            .into_parts();
        let target = Resolver::new("roblox.com", "v1")
            .resolve(parts.uri.path(), parts.uri.query())
            .unwrap();

        let outbound = OutboundRequest::new(&parts, Bytes::from_static(b"{\"a\":1}"), &target, None);
        let request = outbound.to_request();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.uri().to_string(), "https://groups.roblox.com/7/wall?cursor=x");
        assert_eq!(request.headers().get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(request.headers().get(header::USER_AGENT).unwrap(), "RoProxy");
        assert!(request.headers().get("roblox-id").is_none());
        assert_eq!(request.body(), &Bytes::from_static(b"{\"a\":1}"));
    }

    #[test]
    fn test_each_attempt_gets_a_fresh_request() {
        let (parts, ()) = Request::builder().uri("/a/b").body(()).unwrap().into_parts();
        let target = Resolver::new("roblox.com", "v1").resolve("/a/b", None).unwrap();
        let outbound = OutboundRequest::new(&parts, Bytes::new(), &target, None);

        let mut first = outbound.to_request();
        first.headers_mut().insert("x-mutated", HeaderValue::from_static("1"));
        let second = outbound.to_request();
        assert!(second.headers().get("x-mutated").is_none());
    }
}
