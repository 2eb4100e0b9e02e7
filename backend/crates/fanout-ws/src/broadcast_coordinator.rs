use crate::{
    BroadcastSummary, CleanupQueue, DeliveryChannel, DeliveryResult, Metrics, MetricsTimer,
    Result as WsErrorResult, WsError,
};

use fanout_core::{ConnectionId, Payload};
use fanout_db::{ConnectionStore, RegistryScan};

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use log::{debug, warn};

/// Delivers one payload to every registered connection.
///
/// Pages are fanned out one at a time; within a page up to `max_in_flight`
/// sends run concurrently and their results are folded here, in this task.
pub struct BroadcastCoordinator {
    store: Arc<dyn ConnectionStore>,
    cleanup: Arc<CleanupQueue>,
    page_size: u32,
    max_in_flight: usize,
    metrics: Metrics,
}

impl BroadcastCoordinator {
    pub fn new(
        store: Arc<dyn ConnectionStore>,
        cleanup: Arc<CleanupQueue>,
        page_size: u32,
        max_in_flight: usize,
        metrics: Metrics,
    ) -> Self {
        Self {
            store,
            cleanup,
            page_size,
            max_in_flight: max_in_flight.max(1),
            metrics,
        }
    }

    /// Scan the registry and push `payload` through `channel` to every id.
    ///
    /// Only a registry failure fails the broadcast; pages after the failing
    /// one are never fetched. Per-connection outcomes end up in the summary.
    pub async fn broadcast(
        &self,
        channel: Arc<dyn DeliveryChannel>,
        payload: Payload,
    ) -> WsErrorResult<BroadcastSummary> {
        let timer = MetricsTimer::new(self.metrics.clone());
        let mut scan = RegistryScan::new(Arc::clone(&self.store), self.page_size);
        let mut summary = BroadcastSummary::default();

        loop {
            let page = match scan.next_page().await {
                Ok(Some(page)) => page,
                Ok(None) => break,
                Err(e) => {
                    warn!(
                        "Registry scan failed after {} pages ({} deliveries attempted): {e}",
                        summary.pages,
                        summary.attempted()
                    );
                    let error = WsError::from(e);
                    self.metrics.broadcast_failed(error.kind());
                    return Err(error);
                }
            };

            summary.pages += 1;
            debug!("Fanning out page {} ({} ids)", summary.pages, page.len());
            self.fan_out_page(&channel, &payload, page, &mut summary)
                .await;
        }

        timer.finish();
        self.metrics.broadcast_completed(&summary);
        Ok(summary)
    }

    async fn fan_out_page(
        &self,
        channel: &Arc<dyn DeliveryChannel>,
        payload: &Payload,
        page: Vec<ConnectionId>,
        summary: &mut BroadcastSummary,
    ) {
        let mut results = stream::iter(page)
            .map(|id| {
                let channel = Arc::clone(channel);
                let payload = payload.clone();
                async move {
                    let result = channel.send(&id, payload).await;
                    (id, result)
                }
            })
            .buffer_unordered(self.max_in_flight);

        while let Some((id, result)) = results.next().await {
            summary.record(&result);
            match result {
                DeliveryResult::Delivered => {}
                DeliveryResult::Gone => {
                    debug!("Connection {id} is gone, scheduling cleanup");
                    if !self.cleanup.enqueue(id) {
                        summary.cleanup_dropped += 1;
                    }
                }
                DeliveryResult::Transient(e) => {
                    warn!("Failed to post to connection {id}: {e}");
                }
            }
        }
    }
}
