use crate::WsResponse;
use crate::handlers::ws_response::DISCONNECTED;

use fanout_core::ConnectionId;
use fanout_db::ConnectionStore;

use log::{error, info};

/// Remove a closed connection from the registry; absent ids are not an error
pub async fn handle_disconnect(
    store: &dyn ConnectionStore,
    connection_id: &ConnectionId,
) -> WsResponse {
    match store.delete(connection_id).await {
        Ok(()) => {
            info!("Connection {connection_id} deregistered");
            WsResponse::ok(DISCONNECTED)
        }
        Err(e) => {
            error!("Failed to deregister connection {connection_id}: {e}");
            WsResponse::server_error(format!("Failed to disconnect: {}", e.cause()))
        }
    }
}
