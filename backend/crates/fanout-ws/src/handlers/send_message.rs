use crate::handlers::ws_response::DATA_SENT;
use crate::{HandlerContext, Result as WsErrorResult, WsError, WsResponse, create_broadcast_span};

use fanout_core::Payload;

use std::collections::HashMap;

use log::{error, info, warn};
use serde_json::value::RawValue;
use tracing::Instrument;

pub const DATA_FIELD: &str = "data";

/// Pull the `data` member out of a broadcast request, byte for byte.
///
/// The body must be a JSON object whose `data` member is present and not `null`.
pub fn parse_send_message(body: &str) -> WsErrorResult<Payload> {
    let mut fields: HashMap<String, Box<RawValue>> =
        serde_json::from_str(body).map_err(|e| WsError::malformed(e.to_string()))?;

    match fields.remove(DATA_FIELD) {
        Some(raw) if raw.get().trim() != "null" => Ok(Payload::from(raw.get().to_string())),
        _ => Err(WsError::malformed(format!("missing `{DATA_FIELD}` field"))),
    }
}

/// Broadcast the request's `data` to every registered connection
pub async fn handle_send_message(body: &str, ctx: &HandlerContext) -> WsResponse {
    let log_prefix = ctx.log_prefix();

    let payload = match parse_send_message(body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("{log_prefix} Rejected broadcast request: {e}");
            ctx.metrics.broadcast_failed(e.kind());
            return WsResponse::server_error(format!(
                "Failed to unmarshal request: {}",
                e.cause()
            ));
        }
    };

    info!(
        "{log_prefix} Broadcasting {} bytes via {}",
        payload.len(),
        ctx.request_ctx.routing
    );

    let channel = match ctx.factory.create(&ctx.request_ctx.routing) {
        Ok(channel) => channel,
        Err(e) => {
            error!("{log_prefix} No delivery channel: {e}");
            ctx.metrics.broadcast_failed(e.kind());
            return WsResponse::server_error(format!("Failed to send message: {}", e.cause()));
        }
    };

    let span = create_broadcast_span(&ctx.request_ctx);
    match ctx
        .coordinator
        .broadcast(channel, payload)
        .instrument(span)
        .await
    {
        Ok(summary) => {
            info!(
                "{log_prefix} Broadcast finished in {}ms: pages={} delivered={} gone={} transient={} cleanup_dropped={}",
                ctx.request_ctx.elapsed_ms(),
                summary.pages,
                summary.delivered,
                summary.gone,
                summary.transient,
                summary.cleanup_dropped
            );
            WsResponse::ok(DATA_SENT)
        }
        Err(e) => {
            error!("{log_prefix} Broadcast failed: {e}");
            WsResponse::server_error(format!("Failed to send message: {}", e.cause()))
        }
    }
}
