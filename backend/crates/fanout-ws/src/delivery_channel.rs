use crate::{DeliveryError, Result as WsErrorResult, RoutingDescriptor};

use fanout_core::{ConnectionId, Payload};

use std::sync::Arc;

use async_trait::async_trait;

/// Outcome of pushing one payload to one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    Delivered,
    /// The transport reports the connection does not exist
    Gone,
    Transient(DeliveryError),
}

impl DeliveryResult {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Gone => "gone",
            Self::Transient(_) => "transient",
        }
    }
}

/// Pushes payloads to individual connections of one transport endpoint
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn send(&self, id: &ConnectionId, payload: Payload) -> DeliveryResult;
}

/// Builds a channel for one invocation from its routing descriptor
pub trait DeliveryChannelFactory: Send + Sync {
    fn create(&self, routing: &RoutingDescriptor) -> WsErrorResult<Arc<dyn DeliveryChannel>>;
}
