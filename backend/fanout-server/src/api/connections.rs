use crate::api::error::{ApiError, Result as ApiResult};

use fanout_core::{ConnectionId, CoreError, Payload};
use fanout_ws::{AppState, HubPush, payload_frame};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};

/// POST /{stage}/@connections/{connection_id} - push the raw body to one socket.
///
/// This is the endpoint `HttpDeliveryChannel` talks to: 200 when queued on
/// the socket, 410 when no such socket lives here, 429 when its buffer is full.
pub async fn post_to_connection(
    State(state): State<AppState>,
    Path((stage, connection_id)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    if stage != state.stage {
        return Err(ApiError::not_found(format!("unknown stage {stage:?}")));
    }

    let id = ConnectionId::parse(&connection_id).map_err(|e| match e {
        CoreError::InvalidConnectionId { message, .. } => ApiError::bad_request(message),
    })?;

    match state.hub.push(&id, payload_frame(Payload::new(body))).await {
        HubPush::Sent => Ok(StatusCode::OK),
        HubPush::Unknown | HubPush::Closed => Err(ApiError::gone(id.as_str())),
        HubPush::Full => Err(ApiError::too_many_requests(id.as_str())),
    }
}
