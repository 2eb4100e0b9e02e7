use fanout_core::ConnectionId;
use fanout_db::SqliteConnectionStore;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub const TEST_TABLE_NAME: &str = "connections";

/// Creates an in-memory SQLite pool
pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test pool")
}

/// In-memory store over the default table
pub async fn create_test_store() -> SqliteConnectionStore {
    SqliteConnectionStore::new(create_test_pool().await, TEST_TABLE_NAME)
        .await
        .expect("Failed to create test store")
}

pub fn generate_ids(count: usize) -> Vec<ConnectionId> {
    (0..count).map(|_| ConnectionId::generate()).collect()
}
