use crate::{CleanupPolicy, Metrics};

use fanout_core::ConnectionId;
use fanout_db::ConnectionStore;

use std::sync::{Arc, RwLock};

use log::{debug, info, warn};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

/// Bounded fire-and-forget queue of registry deletes for connections found gone.
///
/// Enqueueing never waits. Nothing here reports back to the broadcast that
/// produced the request.
pub struct CleanupQueue {
    sender: RwLock<Option<mpsc::Sender<ConnectionId>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    metrics: Metrics,
}

impl CleanupQueue {
    /// Spawn `workers` tasks draining a queue of `capacity` pending deletes
    pub fn start(
        store: Arc<dyn ConnectionStore>,
        policy: Arc<dyn CleanupPolicy>,
        capacity: usize,
        workers: usize,
        metrics: Metrics,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<ConnectionId>(capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let handles = (0..workers.max(1))
            .map(|worker| {
                tokio::spawn(run_worker(
                    worker,
                    Arc::clone(&rx),
                    Arc::clone(&store),
                    Arc::clone(&policy),
                    metrics.clone(),
                ))
            })
            .collect();

        Self {
            sender: RwLock::new(Some(tx)),
            workers: Mutex::new(handles),
            metrics,
        }
    }

    /// Queue a delete for `id`. Returns false when it was dropped.
    pub fn enqueue(&self, id: ConnectionId) -> bool {
        let guard = match self.sender.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let Some(sender) = guard.as_ref() else {
            debug!("Cleanup queue closed, dropping delete for {id}");
            self.metrics.cleanup_dropped();
            return false;
        };

        match sender.try_send(id) {
            Ok(()) => {
                self.metrics.cleanup_enqueued();
                true
            }
            Err(mpsc::error::TrySendError::Full(id)) => {
                warn!("Cleanup queue full, dropping delete for stale connection {id}");
                self.metrics.cleanup_dropped();
                false
            }
            Err(mpsc::error::TrySendError::Closed(id)) => {
                debug!("Cleanup queue closed, dropping delete for {id}");
                self.metrics.cleanup_dropped();
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        match self.sender.read() {
            Ok(guard) => guard.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }

    /// Stop accepting deletes and wait for the workers to drain what is queued
    pub async fn shutdown(&self) {
        let sender = match self.sender.write() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        drop(sender);

        let handles = std::mem::take(&mut *self.workers.lock().await);
        let count = handles.len();
        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Cleanup worker ended abnormally: {e}");
            }
        }

        if count > 0 {
            info!("Cleanup queue drained ({count} workers stopped)");
        }
    }
}

async fn run_worker(
    worker: usize,
    rx: Arc<Mutex<mpsc::Receiver<ConnectionId>>>,
    store: Arc<dyn ConnectionStore>,
    policy: Arc<dyn CleanupPolicy>,
    metrics: Metrics,
) {
    loop {
        let next = { rx.lock().await.recv().await };
        let Some(id) = next else {
            break;
        };

        if !policy.allow() {
            debug!("Cleanup worker {worker}: circuit open, skipping delete for {id}");
            metrics.cleanup_skipped();
            continue;
        }

        match store.delete(&id).await {
            Ok(()) => {
                debug!("Cleanup worker {worker}: removed stale connection {id}");
                policy.on_success(&id);
                metrics.cleanup_completed();
            }
            Err(e) => {
                policy.on_failure(&id, &e);
                metrics.cleanup_failed();
            }
        }
    }
}
