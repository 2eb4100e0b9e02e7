use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Outgoing frames buffered per socket before deliveries report BufferFull
pub const MIN_SEND_BUFFER_SIZE: usize = 1;
pub const MAX_SEND_BUFFER_SIZE: usize = 10000;
pub const DEFAULT_SEND_BUFFER_SIZE: usize = 64;

pub const MIN_HEARTBEAT_INTERVAL_SECS: u64 = 5;
pub const MAX_HEARTBEAT_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 30;

pub const MIN_HEARTBEAT_TIMEOUT_SECS: u64 = 10;
pub const MAX_HEARTBEAT_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_HEARTBEAT_TIMEOUT_SECS: u64 = 90;

pub const MIN_MAX_MESSAGE_BYTES: usize = 1024;
pub const MAX_MAX_MESSAGE_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 128 * 1024;

/// Per-socket settings for the bundled WebSocket transport.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    pub send_buffer_size: usize,
    /// Ping interval in seconds
    pub heartbeat_interval_secs: u64,
    /// Close the socket when nothing was heard from the client for this long
    pub heartbeat_timeout_secs: u64,
    /// Largest inbound frame accepted from a client
    pub max_message_bytes: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
            heartbeat_timeout_secs: DEFAULT_HEARTBEAT_TIMEOUT_SECS,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

impl WebSocketConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !(MIN_SEND_BUFFER_SIZE..=MAX_SEND_BUFFER_SIZE).contains(&self.send_buffer_size) {
            return Err(ConfigError::websocket(format!(
                "websocket.send_buffer_size must be {}-{}, got {}",
                MIN_SEND_BUFFER_SIZE, MAX_SEND_BUFFER_SIZE, self.send_buffer_size
            )));
        }

        if !(MIN_HEARTBEAT_INTERVAL_SECS..=MAX_HEARTBEAT_INTERVAL_SECS)
            .contains(&self.heartbeat_interval_secs)
        {
            return Err(ConfigError::websocket(format!(
                "websocket.heartbeat_interval_secs must be {}-{}, got {}",
                MIN_HEARTBEAT_INTERVAL_SECS,
                MAX_HEARTBEAT_INTERVAL_SECS,
                self.heartbeat_interval_secs
            )));
        }

        if !(MIN_HEARTBEAT_TIMEOUT_SECS..=MAX_HEARTBEAT_TIMEOUT_SECS)
            .contains(&self.heartbeat_timeout_secs)
        {
            return Err(ConfigError::websocket(format!(
                "websocket.heartbeat_timeout_secs must be {}-{}, got {}",
                MIN_HEARTBEAT_TIMEOUT_SECS, MAX_HEARTBEAT_TIMEOUT_SECS, self.heartbeat_timeout_secs
            )));
        }

        if self.heartbeat_timeout_secs <= self.heartbeat_interval_secs {
            return Err(ConfigError::websocket(format!(
                "websocket.heartbeat_timeout_secs ({}) must be greater than heartbeat_interval_secs ({})",
                self.heartbeat_timeout_secs, self.heartbeat_interval_secs
            )));
        }

        if !(MIN_MAX_MESSAGE_BYTES..=MAX_MAX_MESSAGE_BYTES).contains(&self.max_message_bytes) {
            return Err(ConfigError::websocket(format!(
                "websocket.max_message_bytes must be {}-{}, got {}",
                MIN_MAX_MESSAGE_BYTES, MAX_MAX_MESSAGE_BYTES, self.max_message_bytes
            )));
        }

        Ok(())
    }
}
