use crate::{ConfigError, ConfigErrorResult, DEFAULT_DATABASE_FILENAME, DEFAULT_TABLE_NAME};

use std::path::Path;

use serde::Deserialize;

pub const MAX_TABLE_NAME_LENGTH: usize = 64;

pub const MIN_SCAN_PAGE_SIZE: u32 = 1;
pub const MAX_SCAN_PAGE_SIZE: u32 = 10000;
pub const DEFAULT_SCAN_PAGE_SIZE: u32 = 100;

pub const MIN_POOL_CONNECTIONS: u32 = 1;
pub const MAX_POOL_CONNECTIONS: u32 = 64;
pub const DEFAULT_POOL_CONNECTIONS: u32 = 5;

/// Connection registry settings, handed to the store constructor at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Table holding one row per live connection id
    pub table_name: String,
    /// Database file, relative to the config directory
    pub database_path: String,
    /// Rows fetched per scan page during a broadcast
    pub scan_page_size: u32,
    pub max_pool_connections: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            table_name: String::from(DEFAULT_TABLE_NAME),
            database_path: String::from(DEFAULT_DATABASE_FILENAME),
            scan_page_size: DEFAULT_SCAN_PAGE_SIZE,
            max_pool_connections: DEFAULT_POOL_CONNECTIONS,
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !is_valid_table_name(&self.table_name) {
            return Err(ConfigError::registry(format!(
                "registry.table_name must match [A-Za-z_][A-Za-z0-9_]{{0,{}}}, got {:?}",
                MAX_TABLE_NAME_LENGTH - 1,
                self.table_name
            )));
        }

        let db_path = Path::new(&self.database_path);
        if self.database_path.is_empty()
            || db_path.is_absolute()
            || self.database_path.contains("..")
        {
            return Err(ConfigError::registry(
                "registry.database_path must be relative and cannot contain '..'",
            ));
        }

        if self.scan_page_size < MIN_SCAN_PAGE_SIZE || self.scan_page_size > MAX_SCAN_PAGE_SIZE {
            return Err(ConfigError::registry(format!(
                "registry.scan_page_size must be {}-{}, got {}",
                MIN_SCAN_PAGE_SIZE, MAX_SCAN_PAGE_SIZE, self.scan_page_size
            )));
        }

        if self.max_pool_connections < MIN_POOL_CONNECTIONS
            || self.max_pool_connections > MAX_POOL_CONNECTIONS
        {
            return Err(ConfigError::registry(format!(
                "registry.max_pool_connections must be {}-{}, got {}",
                MIN_POOL_CONNECTIONS, MAX_POOL_CONNECTIONS, self.max_pool_connections
            )));
        }

        Ok(())
    }
}

/// Table names are interpolated into SQL, so only plain identifiers are accepted.
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }

    name.len() <= MAX_TABLE_NAME_LENGTH && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
