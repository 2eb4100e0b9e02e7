use fanout_ws::AppState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::warn;
use serde_json::json;

/// GET /health - component status with registry and hub sizes
pub async fn health(State(state): State<AppState>) -> Response {
    let hub_connections = state.hub.total_count().await;

    let (status, registry) = match state.store.count().await {
        Ok(count) => (
            StatusCode::OK,
            json!({ "status": "operational", "connections": count }),
        ),
        Err(e) => {
            warn!("Health check could not reach the registry: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "status": "unavailable", "error": e.cause() }),
            )
        }
    };

    let overall = if status.is_success() {
        "healthy"
    } else {
        "unhealthy"
    };
    let cleanup = if state.cleanup.is_closed() {
        "stopped"
    } else {
        "operational"
    };

    let health = json!({
        "status": overall,
        "version": env!("CARGO_PKG_VERSION"),
        "stage": state.stage,
        "components": {
            "registry": registry,
            "hub": {
                "connections": hub_connections,
                "max_connections": state.hub.max_total(),
            },
            "cleanup": cleanup,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status, Json(health)).into_response()
}

/// GET /live - liveness probe (is the process alive?)
pub async fn liveness() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - readiness probe; ready while the registry answers and no shutdown is pending
pub async fn readiness(State(state): State<AppState>) -> Response {
    if state.shutdown.is_shutting_down() {
        return (StatusCode::SERVICE_UNAVAILABLE, "Shutting down").into_response();
    }

    match state.store.count().await {
        Ok(_) => (StatusCode::OK, "Ready").into_response(),
        Err(e) => {
            warn!("Readiness check failed: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, "Registry unavailable").into_response()
        }
    }
}
