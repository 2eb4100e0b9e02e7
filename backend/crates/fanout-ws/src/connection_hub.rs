use crate::{Result as WsErrorResult, WsError};

use fanout_core::ConnectionId;

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use log::{info, warn};
use tokio::sync::{RwLock, mpsc};

/// Result of handing a frame to a hub connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubPush {
    Sent,
    /// No socket with that id lives in this process
    Unknown,
    /// The socket task has exited
    Closed,
    /// The socket's outbound buffer is full
    Full,
}

struct HubEntry {
    sender: mpsc::Sender<Message>,
    connected_at: DateTime<Utc>,
}

/// In-process map of open sockets, keyed by connection id
#[derive(Clone)]
pub struct ConnectionHub {
    inner: Arc<RwLock<HashMap<ConnectionId, HubEntry>>>,
    max_total: usize,
}

impl ConnectionHub {
    pub fn new(max_total: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            max_total,
        }
    }

    /// Register the outbound half of a socket
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::Sender<Message>,
    ) -> WsErrorResult<()> {
        let mut inner = self.inner.write().await;

        if inner.len() >= self.max_total {
            warn!(
                "Total connection limit reached: {}/{}",
                inner.len(),
                self.max_total
            );
            return Err(WsError::ConnectionLimitExceeded {
                current: inner.len(),
                max: self.max_total,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        inner.insert(
            connection_id.clone(),
            HubEntry {
                sender,
                connected_at: Utc::now(),
            },
        );
        info!(
            "Registered connection {connection_id} ({} total)",
            inner.len()
        );

        Ok(())
    }

    pub async fn unregister(&self, connection_id: &ConnectionId) {
        let mut inner = self.inner.write().await;

        if let Some(entry) = inner.remove(connection_id) {
            let open_for = Utc::now() - entry.connected_at;
            info!(
                "Unregistered connection {connection_id} after {}s ({} total remaining)",
                open_for.num_seconds(),
                inner.len()
            );
        }
    }

    /// Queue `message` on the socket without waiting for buffer space
    pub async fn push(&self, connection_id: &ConnectionId, message: Message) -> HubPush {
        let inner = self.inner.read().await;

        let Some(entry) = inner.get(connection_id) else {
            return HubPush::Unknown;
        };

        match entry.sender.try_send(message) {
            Ok(()) => HubPush::Sent,
            Err(mpsc::error::TrySendError::Full(_)) => HubPush::Full,
            Err(mpsc::error::TrySendError::Closed(_)) => HubPush::Closed,
        }
    }

    pub async fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.inner.read().await.contains_key(connection_id)
    }

    pub async fn total_count(&self) -> usize {
        self.inner.read().await.len()
    }

    pub fn max_total(&self) -> usize {
        self.max_total
    }
}
