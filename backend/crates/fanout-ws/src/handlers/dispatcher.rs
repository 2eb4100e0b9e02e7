use crate::HandlerContext;
use crate::WsResponse;
use crate::handlers::send_message::handle_send_message;

use log::info;
use serde_json::Value;

/// Field of a client frame that selects its route
pub const ROUTE_FIELD: &str = "message";
/// Route key used when a frame carries no usable `message` field
pub const DEFAULT_ROUTE_KEY: &str = "$default";
pub const SEND_MESSAGE_ROUTE: &str = "sendmessage";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    SendMessage,
    Unknown(String),
}

impl Route {
    pub fn name(&self) -> &str {
        match self {
            Self::SendMessage => SEND_MESSAGE_ROUTE,
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Pick the route for a text frame from its `message` field
pub fn select_route(frame: &str) -> Route {
    let key = serde_json::from_str::<Value>(frame)
        .ok()
        .and_then(|value| {
            value
                .get(ROUTE_FIELD)
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_ROUTE_KEY.to_string());

    if key == SEND_MESSAGE_ROUTE {
        Route::SendMessage
    } else {
        Route::Unknown(key)
    }
}

/// Route one client frame and run its handler
pub async fn dispatch(frame: &str, ctx: HandlerContext) -> WsResponse {
    let route = select_route(frame);
    ctx.metrics.message_received(route.name());
    info!("{} -> {}", ctx.log_prefix(), route.name());

    let response = match &route {
        Route::SendMessage => handle_send_message(frame, &ctx).await,
        Route::Unknown(key) => WsResponse::bad_request(format!("Unknown route: {key}")),
    };

    info!(
        "{} <- {} {} in {}ms",
        ctx.log_prefix(),
        route.name(),
        response.status_code,
        ctx.request_ctx.elapsed_ms()
    );

    response
}
