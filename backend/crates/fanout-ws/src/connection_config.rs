use fanout_config::WebSocketConfig;

use std::time::Duration;

/// Per-socket settings
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Outbound frames buffered per socket (bounded to handle backpressure)
    pub send_buffer_size: usize,
    pub heartbeat_interval: Duration,
    pub heartbeat_timeout: Duration,
    pub max_message_bytes: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::from(&WebSocketConfig::default())
    }
}

impl From<&WebSocketConfig> for ConnectionConfig {
    fn from(config: &WebSocketConfig) -> Self {
        Self {
            send_buffer_size: config.send_buffer_size.max(1),
            heartbeat_interval: Duration::from_secs(config.heartbeat_interval_secs),
            heartbeat_timeout: Duration::from_secs(config.heartbeat_timeout_secs),
            max_message_bytes: config.max_message_bytes,
        }
    }
}
