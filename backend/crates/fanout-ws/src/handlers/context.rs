use crate::{BroadcastCoordinator, DeliveryChannelFactory, Metrics, RequestContext};

use fanout_db::ConnectionStore;

use std::sync::Arc;

/// Context passed to all handlers containing request metadata and resources.
#[derive(Clone)]
pub struct HandlerContext {
    pub store: Arc<dyn ConnectionStore>,
    pub coordinator: Arc<BroadcastCoordinator>,
    /// Builds the delivery channel for each broadcast from its routing descriptor
    pub factory: Arc<dyn DeliveryChannelFactory>,
    pub metrics: Metrics,
    pub request_ctx: RequestContext,
}

impl HandlerContext {
    pub fn new(
        store: Arc<dyn ConnectionStore>,
        coordinator: Arc<BroadcastCoordinator>,
        factory: Arc<dyn DeliveryChannelFactory>,
        metrics: Metrics,
        request_ctx: RequestContext,
    ) -> Self {
        Self {
            store,
            coordinator,
            factory,
            metrics,
            request_ctx,
        }
    }

    /// Same resources and origin, fresh request id
    pub fn next_request(&self) -> Self {
        Self {
            request_ctx: RequestContext::new(
                self.request_ctx.connection_id.clone(),
                self.request_ctx.routing.clone(),
            ),
            ..self.clone()
        }
    }

    pub fn log_prefix(&self) -> String {
        self.request_ctx.log_prefix()
    }
}
