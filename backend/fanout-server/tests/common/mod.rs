#![allow(dead_code)]

//! Test infrastructure for fanout-server route tests

use fanout_config::{Config, DeliveryMode};
use fanout_db::{ConnectionStore, SqliteConnectionStore};
use fanout_server::{build_app_state, build_router};
use fanout_ws::AppState;

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use axum_test::{TestServer, TestWebSocket};
use metrics_exporter_prometheus::PrometheusBuilder;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Server under test plus handles on the state behind it
pub struct TestApp {
    pub server: TestServer,
    pub app_state: AppState,
    pub store: Arc<SqliteConnectionStore>,
}

impl TestApp {
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

    /// Open a socket on /ws and wait until it is registered
    pub async fn connect_socket(&self) -> TestWebSocket {
        let before = self.store.count().await.expect("count failed");
        let ws = self.server.get_websocket("/ws").await.into_websocket().await;
        self.wait_for_registry_count(before + 1).await;
        ws
    }
}

/// Create a test store over in-memory SQLite
pub async fn create_test_store() -> Arc<SqliteConnectionStore> {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    Arc::new(
        SqliteConnectionStore::new(pool, "connections")
            .await
            .expect("Failed to create registry"),
    )
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.registry.scan_page_size = 2;
    config.cleanup.workers = 1;
    config
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with_config(test_config()).await
}

/// Broadcasts go out over HTTP to this same server's management endpoint,
/// the only domain the delivery allowlist names
pub async fn create_test_app_with_http_delivery() -> TestApp {
    let port = free_local_port();
    let mut config = test_config();
    config.delivery.mode = DeliveryMode::Http;
    config.delivery.allowed_domains = vec![format!("127.0.0.1:{port}")];
    config.validate().expect("http delivery test config is invalid");
    build_test_app(config, Some(port)).await
}

pub async fn create_test_app_with_config(config: Config) -> TestApp {
    build_test_app(config, None).await
}

fn free_local_port() -> u16 {
    let listener = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .expect("Failed to reserve a local port");
    listener
        .local_addr()
        .expect("Failed to read reserved port")
        .port()
}

async fn build_test_app(config: Config, port: Option<u16>) -> TestApp {
    let store = create_test_store().await;
    let app_state =
        build_app_state(&config, store.clone()).expect("Failed to build app state");

    // A private recorder; nothing installs it globally in tests
    let prometheus = PrometheusBuilder::new().build_recorder().handle();
    let app = build_router(app_state.clone(), prometheus);

    let server = TestServer::builder()
        .http_transport_with_ip_port(Some(IpAddr::V4(Ipv4Addr::LOCALHOST)), port)
        .build(app)
        .expect("Failed to create test server");

    TestApp {
        server,
        app_state,
        store,
    }
}
