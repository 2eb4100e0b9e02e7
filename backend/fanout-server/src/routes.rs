use crate::api::{broadcast::broadcast, connections::post_to_connection};
use crate::health;

use fanout_ws::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState, prometheus: PrometheusHandle) -> Router {
    Router::new()
        // WebSocket endpoint
        .route("/ws", get(fanout_ws::handler))
        // Publish endpoints
        .route("/broadcast", post(broadcast))
        .route("/{stage}/@connections/{connection_id}", post(post_to_connection))
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route("/metrics", get(move || async move { prometheus.render() }))
        .with_state(state)
        // CORS middleware (allow all origins for WebSocket)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
