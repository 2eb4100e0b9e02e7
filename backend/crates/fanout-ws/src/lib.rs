pub mod app_state;
pub mod broadcast_coordinator;
pub mod broadcast_summary;
pub mod cleanup_policy;
pub mod cleanup_queue;
pub mod connection_config;
pub mod connection_hub;
pub mod delivery_channel;
pub mod delivery_error;
pub mod error;
pub mod handlers;
pub mod http_delivery;
pub mod local_delivery;
pub mod metrics;
pub mod metrics_timer;
pub mod request_context;
pub mod routing_descriptor;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod web_socket_connection;

pub use app_state::{AppState, handler};
pub use broadcast_coordinator::BroadcastCoordinator;
pub use broadcast_summary::BroadcastSummary;
pub use cleanup_policy::{CircuitBreakingPolicy, CircuitState, CleanupPolicy, LogAndForget};
pub use cleanup_queue::CleanupQueue;
pub use connection_config::ConnectionConfig;
pub use connection_hub::{ConnectionHub, HubPush};
pub use delivery_channel::{DeliveryChannel, DeliveryChannelFactory, DeliveryResult};
pub use delivery_error::DeliveryError;
pub use error::{Result, WsError};
pub use handlers::connect::handle_connect;
pub use handlers::context::HandlerContext;
pub use handlers::disconnect::handle_disconnect;
pub use handlers::dispatcher::{Route, dispatch, select_route};
pub use handlers::send_message::{handle_send_message, parse_send_message};
pub use handlers::ws_response::WsResponse;
pub use http_delivery::{HttpDeliveryChannel, HttpDeliveryFactory};
pub use local_delivery::{LocalDeliveryChannel, LocalDeliveryFactory, payload_frame};
pub use metrics::Metrics;
pub use metrics_timer::MetricsTimer;
pub use request_context::RequestContext;
pub use routing_descriptor::RoutingDescriptor;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use web_socket_connection::WebSocketConnection;

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Span for one broadcast; log entries emitted inside carry these fields.
pub fn create_broadcast_span(request_ctx: &RequestContext) -> tracing::Span {
    let connection_id = request_ctx
        .connection_id
        .as_ref()
        .map(|id| id.as_str())
        .unwrap_or("http");
    info_span!(
        "broadcast",
        request_id = %request_ctx.request_id,
        connection_id = %connection_id,
        stage = %request_ctx.routing.stage,
    )
}
