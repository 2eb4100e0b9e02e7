use crate::WsResponse;
use crate::handlers::ws_response::CONNECTED;

use fanout_core::ConnectionId;
use fanout_db::ConnectionStore;

use log::{error, info};

/// Record a newly opened connection in the registry
pub async fn handle_connect(store: &dyn ConnectionStore, connection_id: &ConnectionId) -> WsResponse {
    match store.insert(connection_id).await {
        Ok(()) => {
            info!("Connection {connection_id} registered");
            WsResponse::ok(CONNECTED)
        }
        Err(e) => {
            error!("Failed to register connection {connection_id}: {e}");
            WsResponse::server_error(format!("Failed to connect: {}", e.cause()))
        }
    }
}
