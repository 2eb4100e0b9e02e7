use crate::Metrics;

use std::time::Instant;

/// Times one broadcast from scan start to the last delivery
pub struct MetricsTimer {
    start: Instant,
    metrics: Metrics,
}

impl MetricsTimer {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    pub fn finish(self) {
        self.metrics.broadcast_latency(self.start.elapsed());
    }
}
