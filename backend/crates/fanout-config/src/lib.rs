mod broadcast_config;
mod cleanup_config;
mod config;
mod delivery_config;
mod error;
mod logging_config;
mod registry_config;
mod server_config;
mod websocket_config;

#[cfg(test)]
mod tests;

pub use broadcast_config::BroadcastConfig;
pub use cleanup_config::{CleanupCircuitBreakerConfig, CleanupConfig};
pub use config::Config;
pub use delivery_config::{DeliveryConfig, DeliveryMode};
pub use error::{ConfigError, ConfigErrorResult};
pub use logging_config::{LogLevel, LoggingConfig};
pub use registry_config::{RegistryConfig, is_valid_table_name};
pub use server_config::ServerConfig;
pub use websocket_config::WebSocketConfig;

const CONFIG_DIR_ENV: &str = "FANOUT_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".fanout";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const MIN_PORT: u16 = 1024;
const DEFAULT_STAGE: &str = "v1";
const DEFAULT_MAX_CONNECTIONS: usize = 10000;
const MIN_MAX_CONNECTIONS: usize = 1;
const MAX_MAX_CONNECTIONS: usize = 1_000_000;

/// Older deployments name the registry table through this variable
const LEGACY_TABLE_NAME_ENV: &str = "CONNECTIONS_TABLENAME";
const DEFAULT_TABLE_NAME: &str = "connections";
const DEFAULT_DATABASE_FILENAME: &str = "registry.db";

const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
