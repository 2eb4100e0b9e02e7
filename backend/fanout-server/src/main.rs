use fanout_server::{ServerError, build_app_state, build_router, logger};

use fanout_config::Config;
use fanout_db::{ConnectionStore, SqliteConnectionStore};
use fanout_ws::{ConnectionHub, ShutdownCoordinator};

use std::error::Error;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use error_location::ErrorLocation;
use log::{error, info, warn};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;

/// How long open sockets get to run their disconnect handler after shutdown
const SOCKET_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);
const METRICS_UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // .env is optional; FANOUT_* variables may come from the real environment
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let config = Config::load()?;
    config.validate()?;

    // Initialize logger (before any other logging)
    let log_file_path = logger::log_file_path(&config)?;
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting fanout-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Metrics recorder; rendered by GET /metrics
    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
    let upkeep = prometheus.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(METRICS_UPKEEP_INTERVAL);
        loop {
            interval.tick().await;
            upkeep.run_upkeep();
        }
    });

    // Connection registry
    let database_path = config.database_path()?;
    info!(
        "Opening connection registry: {} (table {})",
        database_path.display(),
        config.registry.table_name
    );
    let store = SqliteConnectionStore::connect(&database_path, &config.registry).await?;
    let registered = store.count().await?;
    info!("Connection registry ready ({registered} registered connections)");

    // Build application state
    let app_state = build_app_state(&config, Arc::new(store))?;
    let shutdown = app_state.shutdown.clone();
    let hub = app_state.hub.clone();
    let cleanup = Arc::clone(&app_state.cleanup);

    // Build router
    let app = build_router(app_state, prometheus);

    // Create TCP listener
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| ServerError::Bind {
            addr: bind_addr.clone(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

    // Get actual bound address (important when port is 0 / auto-assigned)
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {}", actual_addr);

    spawn_signal_handler(shutdown.clone());

    // Start server with graceful shutdown
    info!("Server ready to accept connections");
    let shutdown_for_serve = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_for_serve.subscribe_guard().wait().await;
            info!("Stopped accepting connections");
        })
        .await
        .map_err(|e| ServerError::Serve {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

    // Upgraded sockets outlive serve(); let them deregister before the queue closes
    wait_for_sockets(&hub).await;
    cleanup.shutdown().await;

    info!("Graceful shutdown complete");
    Ok(())
}

/// Trigger the shutdown coordinator on Ctrl+C, or SIGTERM on unix
fn spawn_signal_handler(shutdown: ShutdownCoordinator) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    error!("Failed to listen for SIGTERM: {}", e);
                    wait_for_ctrl_c(shutdown).await;
                    return;
                }
            };

            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        error!("Failed to listen for SIGINT: {}", e);
                        return;
                    }
                    info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, initiating graceful shutdown");
                }
            }
            shutdown.shutdown();
        }

        #[cfg(not(unix))]
        wait_for_ctrl_c(shutdown).await;
    });
}

async fn wait_for_ctrl_c(shutdown: ShutdownCoordinator) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
            shutdown.shutdown();
        }
        Err(e) => {
            error!("Failed to listen for SIGINT: {}", e);
        }
    }
}

async fn wait_for_sockets(hub: &ConnectionHub) {
    let drained = tokio::time::timeout(SOCKET_DRAIN_TIMEOUT, async {
        while hub.total_count().await > 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await;

    if drained.is_err() {
        warn!(
            "{} sockets still open after {}s; their registry entries are left for the next broadcast to clean up",
            hub.total_count().await,
            SOCKET_DRAIN_TIMEOUT.as_secs()
        );
    }
}
