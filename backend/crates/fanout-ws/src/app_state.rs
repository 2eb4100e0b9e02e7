use crate::handlers::connect::handle_connect;
use crate::handlers::disconnect::handle_disconnect;
use crate::{
    BroadcastCoordinator, CleanupQueue, ConnectionConfig, ConnectionHub, DeliveryChannelFactory,
    HandlerContext, Metrics, RequestContext, RoutingDescriptor, ShutdownCoordinator,
    WebSocketConnection,
};

use fanout_core::ConnectionId;
use fanout_db::ConnectionStore;

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header},
    response::Response,
};
use log::{error, info, warn};
use tokio::sync::mpsc;

/// Domain used when a request carries no `Host` header
pub const FALLBACK_DOMAIN: &str = "localhost";

/// Shared application state for socket and publish handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ConnectionStore>,
    pub hub: ConnectionHub,
    pub factory: Arc<dyn DeliveryChannelFactory>,
    pub coordinator: Arc<BroadcastCoordinator>,
    pub cleanup: Arc<CleanupQueue>,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
    /// Stage segment of this deployment's management endpoint
    pub stage: String,
}

impl AppState {
    /// Routing descriptor for a request: its `Host` plus the configured stage.
    /// HTTP delivery only builds channels for domains in `delivery.allowed_domains`.
    pub fn routing_from_headers(&self, headers: &HeaderMap) -> RoutingDescriptor {
        let domain = headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .filter(|h| !h.is_empty())
            .unwrap_or(FALLBACK_DOMAIN);
        RoutingDescriptor::new(domain, self.stage.clone())
    }

    pub fn handler_context(
        &self,
        connection_id: Option<ConnectionId>,
        routing: RoutingDescriptor,
    ) -> HandlerContext {
        HandlerContext::new(
            Arc::clone(&self.store),
            Arc::clone(&self.coordinator),
            Arc::clone(&self.factory),
            self.metrics.clone(),
            RequestContext::new(connection_id, routing),
        )
    }
}

/// WebSocket upgrade handler
pub async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, (StatusCode, String)> {
    let connection_id = ConnectionId::generate();
    let routing = state.routing_from_headers(&headers);

    // Bounded channel for outgoing frames (backpressure handling)
    let (tx, rx) = mpsc::channel::<Message>(state.config.send_buffer_size);

    // Register in the hub first so the connection limit is enforced before upgrading
    state
        .hub
        .register(connection_id.clone(), tx.clone())
        .await
        .map_err(|e| {
            error!("Refusing WebSocket upgrade: {}", e);
            state.metrics.connection_rejected("limit");
            (StatusCode::SERVICE_UNAVAILABLE, e.cause())
        })?;

    // Record the connection before the handshake completes; a registry failure rejects it
    let connected = handle_connect(state.store.as_ref(), &connection_id).await;
    if !connected.is_success() {
        state.metrics.connection_rejected("registry");
        state.hub.unregister(&connection_id).await;
        return Err((StatusCode::INTERNAL_SERVER_ERROR, connected.body));
    }

    let failed_state = state.clone();
    let failed_id = connection_id.clone();

    Ok(ws
        .max_message_size(state.config.max_message_bytes)
        .on_failed_upgrade(move |e| {
            warn!("WebSocket upgrade for {failed_id} failed: {e}");
            tokio::spawn(async move {
                failed_state.hub.unregister(&failed_id).await;
                let disconnected =
                    handle_disconnect(failed_state.store.as_ref(), &failed_id).await;
                if !disconnected.is_success() {
                    warn!(
                        "Connection {failed_id} left a stale registry entry: {}",
                        disconnected.body
                    );
                }
            });
        })
        .on_upgrade(move |socket| handle_socket(socket, connection_id, routing, tx, rx, state)))
}

/// Run the socket loop, then disconnect
async fn handle_socket(
    socket: WebSocket,
    connection_id: ConnectionId,
    routing: RoutingDescriptor,
    tx: mpsc::Sender<Message>,
    rx: mpsc::Receiver<Message>,
    state: AppState,
) {
    let shutdown_guard = state.shutdown.subscribe_guard();
    let context = state.handler_context(Some(connection_id.clone()), routing);
    let connection = WebSocketConnection::new(
        connection_id.clone(),
        state.config.clone(),
        state.metrics.clone(),
        context,
    );

    let result = connection.handle(socket, tx, rx, shutdown_guard).await;

    state.hub.unregister(&connection_id).await;

    if let Err(e) = result {
        info!("Connection {connection_id} ended: {e}");
    }

    let disconnected = handle_disconnect(state.store.as_ref(), &connection_id).await;
    if !disconnected.is_success() {
        warn!(
            "Connection {connection_id} left a stale registry entry: {}",
            disconnected.body
        );
    }
}
