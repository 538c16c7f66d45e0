//! Shutdown coordination for the gateway.

use std::future::Future;
use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Long-running tasks (the HTTP server) subscribe and stop once triggered.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify every subscriber.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Wait for `signal`, then notify every subscriber.
    pub async fn trigger_after<F>(&self, signal: F)
    where
        F: Future<Output = ()>,
    {
        signal.await;
        self.trigger();
    }

    /// Number of subscribers still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
