use crate::{
    ConnectionStore, DbError, Result as DbErrorResult, ScanCursor, ScanPage, create_registry_pool,
};

use fanout_config::{RegistryConfig, is_valid_table_name};
use fanout_core::ConnectionId;

use std::panic::Location;
use std::path::Path;

use async_trait::async_trait;
use error_location::ErrorLocation;
use sqlx::SqlitePool;

/// Registry backed by a single SQLite table keyed on the connection id.
///
/// The table name comes from configuration, so statements are built once at
/// construction instead of going through `query!`.
pub struct SqliteConnectionStore {
    pool: SqlitePool,
    table_name: String,
    insert_sql: String,
    delete_sql: String,
    first_page_sql: String,
    next_page_sql: String,
    count_sql: String,
}

impl SqliteConnectionStore {
    /// Wrap `pool` and make sure the registry table exists.
    pub async fn new(pool: SqlitePool, table_name: &str) -> DbErrorResult<Self> {
        if !is_valid_table_name(table_name) {
            return Err(DbError::InvalidTableName {
                table_name: table_name.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let store = Self {
            insert_sql: format!(
                r#"INSERT INTO "{table_name}" (connection_id) VALUES (?) ON CONFLICT(connection_id) DO NOTHING"#
            ),
            delete_sql: format!(r#"DELETE FROM "{table_name}" WHERE connection_id = ?"#),
            first_page_sql: format!(
                r#"SELECT connection_id FROM "{table_name}" ORDER BY connection_id LIMIT ?"#
            ),
            next_page_sql: format!(
                r#"SELECT connection_id FROM "{table_name}" WHERE connection_id > ? ORDER BY connection_id LIMIT ?"#
            ),
            count_sql: format!(r#"SELECT COUNT(*) FROM "{table_name}""#),
            table_name: table_name.to_string(),
            pool,
        };

        store.ensure_table().await?;
        Ok(store)
    }

    /// Open the registry database at `db_path` and wrap it
    pub async fn connect(db_path: &Path, config: &RegistryConfig) -> DbErrorResult<Self> {
        let pool = create_registry_pool(db_path, config).await?;
        Self::new(pool, &config.table_name).await
    }

    async fn ensure_table(&self) -> DbErrorResult<()> {
        let ddl = format!(
            r#"CREATE TABLE IF NOT EXISTS "{}" (connection_id TEXT PRIMARY KEY NOT NULL)"#,
            self.table_name
        );
        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }

    /// Delete a row whose value is not a connection id. A failed delete is
    /// logged and retried by the next scan.
    async fn purge_malformed(&self, raw: &str, reason: &str) {
        log::warn!("Removing malformed registry row {raw:?}: {reason}");
        if let Err(e) = sqlx::query(&self.delete_sql)
            .bind(raw)
            .execute(&self.pool)
            .await
        {
            log::warn!("Failed to remove malformed registry row {raw:?}: {e}");
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trip to the database; used by readiness checks
    pub async fn ping(&self) -> DbErrorResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ConnectionStore for SqliteConnectionStore {
    async fn insert(&self, id: &ConnectionId) -> DbErrorResult<()> {
        sqlx::query(&self.insert_sql)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &ConnectionId) -> DbErrorResult<()> {
        sqlx::query(&self.delete_sql)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn scan_page(
        &self,
        cursor: Option<&ScanCursor>,
        limit: u32,
    ) -> DbErrorResult<ScanPage> {
        if limit == 0 {
            return Ok(ScanPage::default());
        }

        let rows: Vec<String> = match cursor {
            None => {
                sqlx::query_scalar(&self.first_page_sql)
                    .bind(i64::from(limit))
                    .fetch_all(&self.pool)
                    .await?
            }
            Some(after) => {
                sqlx::query_scalar(&self.next_page_sql)
                    .bind(after.as_str())
                    .bind(i64::from(limit))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        // A short page means the table is exhausted
        let next = if rows.len() == limit as usize {
            rows.last().map(|last| ScanCursor::new(last.clone()))
        } else {
            None
        };

        let mut ids = Vec::with_capacity(rows.len());
        for raw in rows {
            match ConnectionId::parse(&raw) {
                Ok(id) => ids.push(id),
                Err(e) => self.purge_malformed(&raw, &e.to_string()).await,
            }
        }

        Ok(ScanPage { ids, next })
    }

    async fn count(&self) -> DbErrorResult<u64> {
        let count: i64 = sqlx::query_scalar(&self.count_sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}
