//! Shutdown coordination for the proxy.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Cloneable handle over a broadcast channel; the server and the signal
/// listener each hold one.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

/// One subscriber's view of the shutdown signal.
pub struct ShutdownSignal {
    rx: broadcast::Receiver<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe before triggering; late subscribers miss the signal.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Signal every subscriber. Triggering twice is harmless.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolve once shutdown is triggered or every `Shutdown` handle is gone.
    pub async fn recv(mut self) {
        let _ = self.rx.recv().await;
    }
}
