use crate::error::Result as ServerErrorResult;

use fanout_config::{Config, DeliveryMode};
use fanout_db::ConnectionStore;
use fanout_ws::{
    AppState, BroadcastCoordinator, CircuitBreakingPolicy, CleanupPolicy, CleanupQueue,
    ConnectionConfig, ConnectionHub, DeliveryChannelFactory, HttpDeliveryFactory,
    LocalDeliveryFactory, LogAndForget, Metrics, ShutdownCoordinator,
};

use std::sync::Arc;

use log::info;

/// Wire the hub, cleanup workers, coordinator and delivery factory around `store`.
///
/// Spawns the cleanup workers, so it must run inside a tokio runtime.
pub fn build_app_state(
    config: &Config,
    store: Arc<dyn ConnectionStore>,
) -> ServerErrorResult<AppState> {
    let metrics = Metrics::new();
    let hub = ConnectionHub::new(config.server.max_connections);

    let policy: Arc<dyn CleanupPolicy> = if config.cleanup.circuit_breaker.enabled {
        Arc::new(CircuitBreakingPolicy::from_config(
            &config.cleanup.circuit_breaker,
        ))
    } else {
        Arc::new(LogAndForget)
    };

    let factory: Arc<dyn DeliveryChannelFactory> = match config.delivery.mode {
        DeliveryMode::Local => Arc::new(LocalDeliveryFactory::new(hub.clone())),
        DeliveryMode::Http => Arc::new(HttpDeliveryFactory::new(&config.delivery)?),
    };
    info!("Delivery mode: {}", config.delivery.mode);

    let cleanup = Arc::new(CleanupQueue::start(
        Arc::clone(&store),
        policy,
        config.cleanup.queue_capacity,
        config.cleanup.workers,
        metrics.clone(),
    ));

    let coordinator = Arc::new(BroadcastCoordinator::new(
        Arc::clone(&store),
        Arc::clone(&cleanup),
        config.registry.scan_page_size,
        config.broadcast.max_in_flight,
        metrics.clone(),
    ));

    Ok(AppState {
        store,
        hub,
        factory,
        coordinator,
        cleanup,
        metrics,
        shutdown: ShutdownCoordinator::new(),
        config: ConnectionConfig::from(&config.websocket),
        stage: config.server.stage.clone(),
    })
}
