use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;

/// Per-task view of the shutdown signal
pub struct ShutdownGuard {
    shutdown_rx: broadcast::Receiver<()>,
    triggered: Arc<AtomicBool>,
}

impl ShutdownGuard {
    pub(crate) fn new(shutdown_rx: broadcast::Receiver<()>, triggered: Arc<AtomicBool>) -> Self {
        Self {
            shutdown_rx,
            triggered,
        }
    }

    /// Resolves once shutdown is triggered, including before this guard existed
    pub async fn wait(&mut self) {
        if self.triggered.load(Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown_rx.recv().await;
    }
}
