use fanout_ws::{AppState, WsResponse, handle_send_message};

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use log::warn;

/// POST /broadcast - publish over HTTP with the same contract as the socket route.
///
/// The response carries the handler's status code and the `{statusCode, body}` pair.
pub async fn broadcast(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.metrics.message_received("http_broadcast");

    let routing = state.routing_from_headers(&headers);
    let ctx = state.handler_context(None, routing);

    let response = match std::str::from_utf8(&body) {
        Ok(text) => handle_send_message(text, &ctx).await,
        Err(e) => {
            warn!("{} Broadcast body is not UTF-8: {e}", ctx.log_prefix());
            WsResponse::server_error(format!("Failed to unmarshal request: {e}"))
        }
    };

    into_http(response)
}

fn into_http(response: WsResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response)).into_response()
}
