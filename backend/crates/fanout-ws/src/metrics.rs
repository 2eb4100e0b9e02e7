use crate::BroadcastSummary;

use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Metrics collector for socket and broadcast operations
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "fanout_ws" }
    }

    pub fn connection_established(&self) {
        counter!(format!("{}.connections.established", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).increment(1.0);
    }

    pub fn connection_rejected(&self, reason: &str) {
        counter!(format!("{}.connections.rejected.{}", self.prefix, reason)).increment(1);
    }

    pub fn connection_closed(&self, reason: &str) {
        counter!(format!("{}.connections.closed", self.prefix)).increment(1);
        counter!(format!("{}.connections.closed.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).decrement(1.0);
    }

    /// Record a frame received from a client, by route
    pub fn message_received(&self, route: &str) {
        counter!(format!("{}.messages.received", self.prefix)).increment(1);
        counter!(format!("{}.messages.received.{}", self.prefix, route)).increment(1);
    }

    pub fn broadcast_completed(&self, summary: &BroadcastSummary) {
        counter!(format!("{}.broadcast.completed", self.prefix)).increment(1);
        counter!(format!("{}.broadcast.pages", self.prefix)).increment(summary.pages as u64);
        counter!(format!("{}.delivery.delivered", self.prefix))
            .increment(summary.delivered as u64);
        counter!(format!("{}.delivery.gone", self.prefix)).increment(summary.gone as u64);
        counter!(format!("{}.delivery.transient", self.prefix))
            .increment(summary.transient as u64);
    }

    pub fn broadcast_failed(&self, kind: &str) {
        counter!(format!("{}.broadcast.failed", self.prefix)).increment(1);
        counter!(format!("{}.broadcast.failed.{}", self.prefix, kind)).increment(1);
    }

    pub fn broadcast_latency(&self, duration: Duration) {
        histogram!(format!("{}.broadcast.latency_ms", self.prefix))
            .record(duration.as_millis() as f64);
    }

    pub fn cleanup_enqueued(&self) {
        counter!(format!("{}.cleanup.enqueued", self.prefix)).increment(1);
    }

    pub fn cleanup_dropped(&self) {
        counter!(format!("{}.cleanup.dropped", self.prefix)).increment(1);
    }

    pub fn cleanup_skipped(&self) {
        counter!(format!("{}.cleanup.skipped", self.prefix)).increment(1);
    }

    pub fn cleanup_completed(&self) {
        counter!(format!("{}.cleanup.completed", self.prefix)).increment(1);
    }

    pub fn cleanup_failed(&self) {
        counter!(format!("{}.cleanup.failed", self.prefix)).increment(1);
    }

    pub fn error_occurred(&self, error_type: &str) {
        counter!(format!("{}.errors.total", self.prefix)).increment(1);
        counter!(format!("{}.errors.{}", self.prefix, error_type)).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
