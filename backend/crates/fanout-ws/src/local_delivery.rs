use crate::{
    ConnectionHub, DeliveryChannel, DeliveryChannelFactory, DeliveryError, DeliveryResult,
    HubPush, Result as WsErrorResult, RoutingDescriptor,
};

use fanout_core::{ConnectionId, Payload};

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::Message;

/// Frame for a payload: text when it is UTF-8, binary otherwise
pub fn payload_frame(payload: Payload) -> Message {
    match payload.as_text() {
        Some(text) => Message::Text(text.to_owned().into()),
        None => Message::Binary(payload.into()),
    }
}

/// Delivers straight into sockets held by this process
pub struct LocalDeliveryChannel {
    hub: ConnectionHub,
    routing: RoutingDescriptor,
}

impl LocalDeliveryChannel {
    pub fn new(hub: ConnectionHub, routing: RoutingDescriptor) -> Self {
        Self { hub, routing }
    }

    pub fn routing(&self) -> &RoutingDescriptor {
        &self.routing
    }
}

#[async_trait]
impl DeliveryChannel for LocalDeliveryChannel {
    async fn send(&self, id: &ConnectionId, payload: Payload) -> DeliveryResult {
        match self.hub.push(id, payload_frame(payload)).await {
            HubPush::Sent => DeliveryResult::Delivered,
            HubPush::Unknown | HubPush::Closed => DeliveryResult::Gone,
            HubPush::Full => DeliveryResult::Transient(DeliveryError::BufferFull),
        }
    }
}

#[derive(Clone)]
pub struct LocalDeliveryFactory {
    hub: ConnectionHub,
}

impl LocalDeliveryFactory {
    pub fn new(hub: ConnectionHub) -> Self {
        Self { hub }
    }
}

impl DeliveryChannelFactory for LocalDeliveryFactory {
    fn create(&self, routing: &RoutingDescriptor) -> WsErrorResult<Arc<dyn DeliveryChannel>> {
        Ok(Arc::new(LocalDeliveryChannel::new(
            self.hub.clone(),
            routing.clone(),
        )))
    }
}
