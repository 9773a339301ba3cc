//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the upstream response to the client: status, body, headers
//!
//! # Design Decisions
//! - Body bytes are passed through unchanged (no re-encoding)
//! - Hop-by-hop headers of the upstream connection are not relayed
//! - Nothing is added on top of what the upstream sent

use axum::body::{Body, Bytes};
use axum::http::Response;

use crate::security::headers::relay_response_headers;

/// Copy an upstream response onto a fresh client response.
pub fn relay(upstream: Response<Bytes>) -> Response<Body> {
    let (parts, body) = upstream.into_parts();

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = parts.status;
    relay_response_headers(&parts.headers, response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};

    #[tokio::test]
    async fn test_relay_copies_status_body_and_headers() {
        let upstream = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-ratelimit-remaining", "9")
            .body(Bytes::from_static(br#"{"error":"x"}"#))
            .unwrap();

        let response = relay(upstream);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(response.headers().get("x-ratelimit-remaining").unwrap(), "9");
        assert_eq!(response.headers().len(), 2);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"x"}"#);
    }
}
