//! Outbound dispatch to upstream services.
//!
//! # Responsibilities
//! - Define the [`Dispatch`] capability the forwarding engine sends through
//! - Provide the pooled HTTPS implementation used in production
//!
//! # Design Decisions
//! - One client per process, shared behind `Arc<dyn Dispatch>`
//! - A dispatch only succeeds once the whole response body has arrived, so a
//!   connection dropped mid-body counts as a transport failure
//! - Deadlines are applied by the caller, not by the client

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use bytes::Bytes;
use http_body_util::BodyExt;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioTimer},
};
use thiserror::Error;

use crate::config::UpstreamConfig;

/// Anything that stops a well-formed HTTP response from being received.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to read response body: {0}")]
    Body(#[source] hyper::Error),
}

/// Sends one fully buffered request and returns one fully buffered response.
///
/// Any HTTP response, whatever its status, is `Ok`.
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn dispatch(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError>;
}

/// Connection-pooling HTTPS client.
#[derive(Clone)]
pub struct HttpsDispatcher {
    client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl HttpsDispatcher {
    pub fn new(config: &UpstreamConfig) -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_only()
            .enable_http1()
            .enable_http2()
            .build();

        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
            .build(connector);

        Self { client }
    }
}

#[async_trait]
impl Dispatch for HttpsDispatcher {
    async fn dispatch(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        let response = self
            .client
            .request(request.map(Body::from))
            .await
            .map_err(|e| TransportError::Request(Box::new(e)))?;

        let (parts, body) = response.into_parts();
        let body = body.collect().await.map_err(TransportError::Body)?.to_bytes();

        Ok(Response::from_parts(parts, body))
    }
}
