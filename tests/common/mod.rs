//! Shared utilities for integration testing.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{Request, Response};
use tokio::net::TcpListener;

use roproxy::config::ProxyConfig;
use roproxy::{Dispatch, HttpServer, Shutdown, TransportError};

/// One scripted upstream outcome.
#[allow(dead_code)]
pub enum Reply {
    /// Transport-level failure (connection refused).
    Fail,
    /// Respond after a delay.
    Slow(Duration, u16, &'static str),
    /// Respond with a status, extra headers and a body.
    Respond {
        status: u16,
        headers: Vec<(&'static str, &'static str)>,
        body: &'static str,
    },
}

impl Reply {
    #[allow(dead_code)]
    pub fn ok(body: &'static str) -> Self {
        Reply::Respond {
            status: 200,
            headers: vec![],
            body,
        }
    }

    #[allow(dead_code)]
    pub fn status(status: u16, body: &'static str) -> Self {
        Reply::Respond {
            status,
            headers: vec![],
            body,
        }
    }
}

/// Stub upstream that records every request and plays back a script.
///
/// Once the script runs out every further dispatch fails.
pub struct RecordingDispatcher {
    script: Mutex<VecDeque<Reply>>,
    seen: Mutex<Vec<Request<Bytes>>>,
}

#[allow(dead_code)]
impl RecordingDispatcher {
    pub fn new(script: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Self::new(vec![])
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<Request<Bytes>> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|req| {
                let mut copy = Request::new(req.body().clone());
                *copy.method_mut() = req.method().clone();
                *copy.uri_mut() = req.uri().clone();
                *copy.headers_mut() = req.headers().clone();
                copy
            })
            .collect()
    }
}

#[async_trait]
impl Dispatch for RecordingDispatcher {
    async fn dispatch(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        self.seen.lock().unwrap().push(request);
        let reply = self.script.lock().unwrap().pop_front().unwrap_or(Reply::Fail);

        match reply {
            Reply::Fail => Err(TransportError::Request("connection refused".into())),
            Reply::Slow(delay, status, body) => {
                tokio::time::sleep(delay).await;
                Ok(Response::builder()
                    .status(status)
                    .body(Bytes::from_static(body.as_bytes()))
                    .unwrap())
            }
            Reply::Respond {
                status,
                headers,
                body,
            } => {
                let mut builder = Response::builder().status(status);
                for (name, value) in headers {
                    builder = builder.header(name, value);
                }
                Ok(builder.body(Bytes::from_static(body.as_bytes())).unwrap())
            }
        }
    }
}

/// Config tuned for tests: tiny backoff, short deadline.
#[allow(dead_code)]
pub fn test_config(max_retries: u32, secret: Option<&str>) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.upstream.max_retries = max_retries;
    config.upstream.backoff_ms = 1;
    config.upstream.read_timeout_secs = 1;
    config.security.shared_secret = secret.map(str::to_string);
    config
}

/// Start the proxy on an ephemeral port; returns its address and the
/// shutdown handle.
#[allow(dead_code)]
pub async fn spawn_proxy(
    config: ProxyConfig,
    dispatcher: Arc<dyn Dispatch>,
) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind(config.listener.bind_address()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::with_dispatcher(config, dispatcher).unwrap();
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    (addr, shutdown)
}
