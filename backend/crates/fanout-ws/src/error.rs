use fanout_db::DbError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection registry unavailable: {source} {location}")]
    StoreUnavailable {
        #[source]
        source: DbError,
        location: ErrorLocation,
    },

    #[error("Malformed request: {message} {location}")]
    MalformedRequest {
        message: String,
        location: ErrorLocation,
    },

    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Connection limit exceeded: {current} connections (max: {max}) {location}")]
    ConnectionLimitExceeded {
        current: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Heartbeat timeout after {timeout_secs}s {location}")]
    HeartbeatTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Delivery channel unavailable: {message} {location}")]
    ChannelUnavailable {
        message: String,
        location: ErrorLocation,
    },
}

impl WsError {
    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Description without the source location, for response bodies and close frames
    pub fn cause(&self) -> String {
        match self {
            Self::StoreUnavailable { source, .. } => source.cause(),
            Self::MalformedRequest { message, .. }
            | Self::ChannelUnavailable { message, .. } => message.clone(),
            Self::ConnectionClosed { reason, .. } => reason.clone(),
            Self::ConnectionLimitExceeded { current, max, .. } => {
                format!("connection limit reached ({current}/{max})")
            }
            Self::HeartbeatTimeout { timeout_secs, .. } => {
                format!("no heartbeat for {timeout_secs}s")
            }
        }
    }

    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::MalformedRequest { .. } => "malformed_request",
            Self::ConnectionClosed { .. } => "connection_closed",
            Self::ConnectionLimitExceeded { .. } => "connection_limit",
            Self::HeartbeatTimeout { .. } => "heartbeat_timeout",
            Self::ChannelUnavailable { .. } => "channel_unavailable",
        }
    }
}

impl From<DbError> for WsError {
    #[track_caller]
    fn from(source: DbError) -> Self {
        Self::StoreUnavailable {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;
