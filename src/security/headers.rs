//! Header manipulation between hops.
//!
//! # Responsibilities
//! - Build the outbound header set from the client's headers
//! - Pin `Accept`, `User-Agent` and the proxy credential to fixed values
//! - Keep `Roblox-Id` from crossing hops
//! - Strip hop-by-hop headers in both directions
//!
//! # Design Decisions
//! - Fixed values are applied after the bulk copy so a client can never
//!   override them
//! - Connection-scoped headers belong to one hop; the client regenerates
//!   `Host` and body framing for the upstream connection

use axum::http::{
    header::{self, HeaderName},
    HeaderMap, HeaderValue,
};

/// Inbound credential header, also injected on the outbound request.
pub const PROXY_KEY: HeaderName = HeaderName::from_static("proxykey");

/// Upstream-internal header that never crosses the proxy.
pub const ROBLOX_ID: HeaderName = HeaderName::from_static("roblox-id");

/// `Accept` sent on every outbound request.
pub const ACCEPT_VALUE: HeaderValue = HeaderValue::from_static("application/json");

/// `User-Agent` sent on every outbound request.
pub const USER_AGENT_VALUE: HeaderValue = HeaderValue::from_static("RoProxy");

/// Headers scoped to a single connection.
const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::TRANSFER_ENCODING,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name)
}

/// Produce the outbound header set for one attempt.
///
/// Repeated client headers collapse to the last value seen.
pub fn transform_request_headers(inbound: &HeaderMap, secret: Option<&HeaderValue>) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.len() + 2);

    for (name, value) in inbound {
        if name == header::HOST || is_hop_by_hop(name) {
            continue;
        }
        outbound.insert(name.clone(), value.clone());
    }

    outbound.insert(header::ACCEPT, ACCEPT_VALUE);
    if let Some(secret) = secret {
        outbound.insert(PROXY_KEY, secret.clone());
    }
    outbound.insert(header::USER_AGENT, USER_AGENT_VALUE);
    outbound.remove(ROBLOX_ID);

    outbound
}

/// Copy upstream response headers onto the client response.
///
/// Later values for the same name replace earlier ones.
pub fn relay_response_headers(upstream: &HeaderMap, outbound: &mut HeaderMap) {
    for (name, value) in upstream {
        if is_hop_by_hop(name) {
            continue;
        }
        outbound.insert(name.clone(), value.clone());
    }
}
