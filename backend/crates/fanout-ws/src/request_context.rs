use crate::RoutingDescriptor;

use fanout_core::ConnectionId;

use std::time::Instant;

use uuid::Uuid;

/// Per-invocation context for correlation and logging
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    /// Publishing socket; `None` for HTTP publishers
    pub connection_id: Option<ConnectionId>,
    pub routing: RoutingDescriptor,
    pub started_at: Instant,
}

impl RequestContext {
    pub fn new(connection_id: Option<ConnectionId>, routing: RoutingDescriptor) -> Self {
        Self {
            request_id: format!("req-{}", Uuid::new_v4().as_simple()),
            connection_id,
            routing,
            started_at: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    pub fn log_prefix(&self) -> String {
        let conn = self
            .connection_id
            .as_ref()
            .map(|id| id.as_str().chars().take(8).collect::<String>())
            .unwrap_or_else(|| "http".to_string());
        format!(
            "[req={} conn={} stage={}]",
            &self.request_id[..12.min(self.request_id.len())],
            conn,
            self.routing.stage
        )
    }
}
