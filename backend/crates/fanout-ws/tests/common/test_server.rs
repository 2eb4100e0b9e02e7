#![allow(dead_code)]

use fanout_db::{ConnectionStore, SqliteConnectionStore};
use fanout_ws::{
    AppState, BroadcastCoordinator, CleanupQueue, ConnectionConfig, ConnectionHub,
    LocalDeliveryFactory, LogAndForget, Metrics, ShutdownCoordinator,
};

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use axum_test::TestServer;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub const TEST_STAGE: &str = "v1";

/// Configuration for test server instances
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub max_connections: usize,
    pub scan_page_size: u32,
    pub max_in_flight: usize,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            max_connections: 100,
            scan_page_size: 2,
            max_in_flight: 8,
        }
    }
}

impl TestServerConfig {
    /// Create config with strict connection limits (for limit tests)
    pub fn with_strict_limits() -> Self {
        Self {
            max_connections: 2,
            ..Default::default()
        }
    }
}

/// Test server with access to AppState and the registry behind it
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
    pub store: Arc<SqliteConnectionStore>,
}

impl TestServerWithState {
    /// Poll the registry until it holds `expected` rows or a second passes
    pub async fn wait_for_registry_count(&self, expected: u64) -> u64 {
        let mut count = self.store.count().await.expect("count failed");
        for _ in 0..50 {
            if count == expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            count = self.store.count().await.expect("count failed");
        }
        count
    }
}

pub async fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default()).await
}

pub async fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let (app, app_state, store) = create_app(config).await;
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState {
        server,
        app_state,
        store,
    }
}

async fn create_app(config: TestServerConfig) -> (Router, AppState, Arc<SqliteConnectionStore>) {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    let store = Arc::new(
        SqliteConnectionStore::new(pool, "connections")
            .await
            .expect("Failed to create registry"),
    );
    let dyn_store: Arc<dyn ConnectionStore> = store.clone();

    let metrics = Metrics::default();
    let hub = ConnectionHub::new(config.max_connections);
    let cleanup = Arc::new(CleanupQueue::start(
        Arc::clone(&dyn_store),
        Arc::new(LogAndForget),
        64,
        1,
        metrics.clone(),
    ));
    let coordinator = Arc::new(BroadcastCoordinator::new(
        Arc::clone(&dyn_store),
        Arc::clone(&cleanup),
        config.scan_page_size,
        config.max_in_flight,
        metrics.clone(),
    ));

    let app_state = AppState {
        store: dyn_store,
        factory: Arc::new(LocalDeliveryFactory::new(hub.clone())),
        hub,
        coordinator,
        cleanup,
        metrics,
        shutdown: ShutdownCoordinator::new(),
        config: ConnectionConfig::default(),
        stage: TEST_STAGE.to_string(),
    };

    let router = Router::new()
        .route("/ws", get(fanout_ws::handler))
        .with_state(app_state.clone());

    (router, app_state, store)
}
