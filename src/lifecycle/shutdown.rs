//! Shutdown coordination.

use std::future::Future;

use tokio::sync::broadcast;

use crate::lifecycle::signals::wait_for_termination;

/// Coordinator for graceful shutdown.
///
/// The server and any background task subscribe; one trigger stops them all.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Trigger once the process is asked to terminate.
    ///
    /// Returns a receiver subscribed before the listener starts, so an early
    /// signal is never lost.
    pub fn trigger_on_signal(&self) -> broadcast::Receiver<()> {
        self.trigger_on(wait_for_termination())
    }

    fn trigger_on<F>(&self, event: F) -> broadcast::Receiver<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let rx = self.subscribe();
        let shutdown = self.clone();
        tokio::spawn(async move {
            event.await;
            shutdown.trigger();
        });
        rx
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
