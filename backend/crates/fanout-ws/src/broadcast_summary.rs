use crate::DeliveryResult;

/// Per-broadcast tallies, folded by the coordinator task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastSummary {
    pub pages: usize,
    pub delivered: usize,
    pub gone: usize,
    pub transient: usize,
    /// Cleanup requests the full queue refused
    pub cleanup_dropped: usize,
}

impl BroadcastSummary {
    pub fn record(&mut self, result: &DeliveryResult) {
        match result {
            DeliveryResult::Delivered => self.delivered += 1,
            DeliveryResult::Gone => self.gone += 1,
            DeliveryResult::Transient(_) => self.transient += 1,
        }
    }

    pub fn attempted(&self) -> usize {
        self.delivered + self.gone + self.transient
    }
}
