//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler on every path
//! - Wire up middleware (tracing, access gate)
//! - Bind server to listener, shut down gracefully
//! - Resolve the upstream, forward with retries, relay the response

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderValue, Request},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use http_body_util::LengthLimitError;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::validation::validate_config;
use crate::config::{ConfigError, ProxyConfig};
use crate::error::{ProxyError, Result};
use crate::http::request::OutboundRequest;
use crate::http::response::relay;
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::net::client::{Dispatch, HttpsDispatcher};
use crate::observability::metrics;
use crate::resilience::retries::{forward, RetryPolicy};
use crate::routing::Resolver;
use crate::security::access_control::{access_control_middleware, AccessGate};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub resolver: Arc<Resolver>,
    pub dispatcher: Arc<dyn Dispatch>,
    pub retry_policy: RetryPolicy,
    pub secret: Option<HeaderValue>,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
}

impl HttpServer {
    /// Create a server that forwards through the pooled HTTPS client.
    pub fn new(config: ProxyConfig) -> std::result::Result<Self, ConfigError> {
        let dispatcher = Arc::new(HttpsDispatcher::new(&config.upstream));
        Self::with_dispatcher(config, dispatcher)
    }

    /// Create a server that forwards through `dispatcher`.
    pub fn with_dispatcher(
        config: ProxyConfig,
        dispatcher: Arc<dyn Dispatch>,
    ) -> std::result::Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        // validate_config has already checked the secret is a valid header value.
        let secret = config
            .shared_secret()
            .and_then(|secret| HeaderValue::from_str(secret).ok());

        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            resolver: Arc::new(Resolver::from_config(&config.upstream)),
            dispatcher,
            retry_policy: RetryPolicy::from_config(&config.upstream),
            secret: secret.clone(),
        };

        let router = Self::build_router(state, AccessGate::new(secret));
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, gate: AccessGate) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .layer(middleware::from_fn_with_state(gate, access_control_middleware))
            .with_state(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    /// The fully layered router, for driving the proxy without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> std::result::Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            parent_domain = %self.config.upstream.parent_domain,
            auth_enabled = self.config.shared_secret().is_some(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
/// Resolves the upstream, forwards the request, and relays the result.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let span = tracing::info_span!(
        "proxy",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        path = %request.uri().path(),
    );

    match forward_request(&state, request).instrument(span).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), "relayed", start_time);
            response
        }
        Err(e) => {
            metrics::record_request(&method, e.status().as_u16(), e.kind(), start_time);
            e.into_response()
        }
    }
}

async fn forward_request(state: &AppState, request: Request<Body>) -> Result<Response> {
    let (parts, body) = request.into_parts();

    // 1. Resolve upstream
    let target = state
        .resolver
        .resolve(parts.uri.path(), parts.uri.query())
        .inspect_err(|_| tracing::debug!("Path does not map to an upstream"))?;

    tracing::debug!(service = %target.service(), upstream = %target.uri(), "Resolved upstream");

    // 2. Buffer the body so retries resend identical bytes
    let body = read_body(body, state.config.security.max_body_bytes).await?;

    // 3. Dispatch with retries
    let outbound = OutboundRequest::new(&parts, body, &target, state.secret.as_ref());
    let upstream = forward(
        state.dispatcher.as_ref(),
        &state.retry_policy,
        &outbound,
        target.service(),
    )
    .await?;

    // 4. Relay
    Ok(relay(upstream))
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes> {
    axum::body::to_bytes(body, limit).await.map_err(|e| {
        if e.into_inner().is::<LengthLimitError>() {
            ProxyError::BodyTooLarge
        } else {
            ProxyError::BodyRead
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_body_limit() {
        let err = read_body(Body::from("0123456789"), 4).await.unwrap_err();
        assert!(matches!(err, ProxyError::BodyTooLarge));

        let body = read_body(Body::from("0123"), 4).await.unwrap();
        assert_eq!(&body[..], b"0123");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ProxyConfig::default();
        config.upstream.parent_domain.clear();
        assert!(matches!(HttpServer::new(config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_secret_that_is_not_a_header_value_rejected() {
        let mut config = ProxyConfig::default();
        config.security.shared_secret = Some("two\nlines".into());

        match HttpServer::new(config) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "security.shared_secret");
            }
            _ => panic!("secret with a newline should be rejected"),
        }
    }
}
