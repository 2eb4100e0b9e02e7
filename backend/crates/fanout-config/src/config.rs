use crate::{
    BroadcastConfig, CONFIG_DIR_ENV, CONFIG_FILENAME, CleanupConfig, ConfigError,
    ConfigErrorResult, DEFAULT_CONFIG_DIR, DeliveryConfig, LEGACY_TABLE_NAME_ENV, LoggingConfig,
    RegistryConfig, ServerConfig, WebSocketConfig,
};

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub registry: RegistryConfig,
    pub websocket: WebSocketConfig,
    pub delivery: DeliveryConfig,
    pub broadcast: BroadcastConfig,
    pub cleanup: CleanupConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// Loading order:
    /// 1. `FANOUT_CONFIG_DIR` if set, else `./.fanout/`
    /// 2. Create the directory when missing
    /// 3. `config.toml` if present, else defaults
    /// 4. `FANOUT_*` environment overrides (plus the legacy `CONNECTIONS_TABLENAME`)
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides()?;

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Priority: FANOUT_CONFIG_DIR env var > ./.fanout/
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate every section; call once at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.registry.validate()?;
        self.websocket.validate()?;
        self.delivery.validate()?;
        self.broadcast.validate()?;
        self.cleanup.validate()?;

        if let Some(file) = &self.logging.file
            && (file.is_empty() || file.contains('/') || file.contains('\\'))
        {
            return Err(ConfigError::logging(format!(
                "logging.file must be a bare file name, got {file:?}"
            )));
        }

        Ok(())
    }

    /// Absolute path of the registry database file
    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.registry.database_path))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {}:{} stage={} (max {} connections)",
            self.server.host, self.server.port, self.server.stage, self.server.max_connections
        );
        info!(
            "  registry: table={} db={} page={} pool={}",
            self.registry.table_name,
            self.registry.database_path,
            self.registry.scan_page_size,
            self.registry.max_pool_connections
        );
        info!(
            "  websocket: buffer={}, heartbeat={}s/{}s, max_message={}B",
            self.websocket.send_buffer_size,
            self.websocket.heartbeat_interval_secs,
            self.websocket.heartbeat_timeout_secs,
            self.websocket.max_message_bytes
        );
        info!(
            "  delivery: mode={} scheme={} timeout={}ms allowed_domains=[{}]",
            self.delivery.mode,
            self.delivery.endpoint_scheme,
            self.delivery.timeout_ms,
            self.delivery.allowed_domains.join(", ")
        );
        info!("  broadcast: max_in_flight={}", self.broadcast.max_in_flight);
        info!(
            "  cleanup: queue={} workers={} breaker={} (threshold={}, open={}s)",
            self.cleanup.queue_capacity,
            self.cleanup.workers,
            if self.cleanup.circuit_breaker.enabled {
                "enabled"
            } else {
                "disabled"
            },
            self.cleanup.circuit_breaker.failure_threshold,
            self.cleanup.circuit_breaker.open_duration_secs
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) -> ConfigErrorResult<()> {
        // Server
        Self::apply_env_string("FANOUT_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("FANOUT_SERVER_PORT", &mut self.server.port);
        Self::apply_env_string("FANOUT_SERVER_STAGE", &mut self.server.stage);
        Self::apply_env_parse(
            "FANOUT_SERVER_MAX_CONNECTIONS",
            &mut self.server.max_connections,
        );

        // Registry
        Self::apply_env_string(LEGACY_TABLE_NAME_ENV, &mut self.registry.table_name);
        Self::apply_env_string("FANOUT_REGISTRY_TABLE_NAME", &mut self.registry.table_name);
        Self::apply_env_string(
            "FANOUT_REGISTRY_DATABASE_PATH",
            &mut self.registry.database_path,
        );
        Self::apply_env_parse(
            "FANOUT_REGISTRY_SCAN_PAGE_SIZE",
            &mut self.registry.scan_page_size,
        );
        Self::apply_env_parse(
            "FANOUT_REGISTRY_MAX_POOL_CONNECTIONS",
            &mut self.registry.max_pool_connections,
        );

        // WebSocket
        Self::apply_env_parse(
            "FANOUT_WS_SEND_BUFFER_SIZE",
            &mut self.websocket.send_buffer_size,
        );
        Self::apply_env_parse(
            "FANOUT_WS_HEARTBEAT_INTERVAL_SECS",
            &mut self.websocket.heartbeat_interval_secs,
        );
        Self::apply_env_parse(
            "FANOUT_WS_HEARTBEAT_TIMEOUT_SECS",
            &mut self.websocket.heartbeat_timeout_secs,
        );
        Self::apply_env_parse(
            "FANOUT_WS_MAX_MESSAGE_BYTES",
            &mut self.websocket.max_message_bytes,
        );

        // Delivery
        if let Ok(mode) = std::env::var("FANOUT_DELIVERY_MODE") {
            self.delivery.mode = mode.parse()?;
        }
        Self::apply_env_string(
            "FANOUT_DELIVERY_ENDPOINT_SCHEME",
            &mut self.delivery.endpoint_scheme,
        );
        Self::apply_env_parse("FANOUT_DELIVERY_TIMEOUT_MS", &mut self.delivery.timeout_ms);
        Self::apply_env_list(
            "FANOUT_DELIVERY_ALLOWED_DOMAINS",
            &mut self.delivery.allowed_domains,
        );

        // Broadcast
        Self::apply_env_parse(
            "FANOUT_BROADCAST_MAX_IN_FLIGHT",
            &mut self.broadcast.max_in_flight,
        );

        // Cleanup
        Self::apply_env_parse(
            "FANOUT_CLEANUP_QUEUE_CAPACITY",
            &mut self.cleanup.queue_capacity,
        );
        Self::apply_env_parse("FANOUT_CLEANUP_WORKERS", &mut self.cleanup.workers);
        Self::apply_env_bool(
            "FANOUT_CLEANUP_CB_ENABLED",
            &mut self.cleanup.circuit_breaker.enabled,
        );
        Self::apply_env_parse(
            "FANOUT_CLEANUP_CB_FAILURE_THRESHOLD",
            &mut self.cleanup.circuit_breaker.failure_threshold,
        );
        Self::apply_env_parse(
            "FANOUT_CLEANUP_CB_OPEN_DURATION_SECS",
            &mut self.cleanup.circuit_breaker.open_duration_secs,
        );

        // Logging
        Self::apply_env_parse("FANOUT_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("FANOUT_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("FANOUT_LOG_FILE", &mut self.logging.file);

        Ok(())
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Accepts "true"/"1"
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Unparseable values are ignored with a warning so validate() sees the previous value
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name) {
            match val.parse() {
                Ok(parsed) => *target = parsed,
                Err(_) => warn!("Ignoring unparseable {var_name}={val:?}"),
            }
        }
    }

    /// Comma-separated; blank items are dropped
    fn apply_env_list(var_name: &str, target: &mut Vec<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect();
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
