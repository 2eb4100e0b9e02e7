use fanout_config::ConfigError;
use fanout_db::DbError;
use fanout_ws::WsError;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] DbError),

    #[error("Delivery setup error: {0}")]
    Delivery(#[from] WsError),

    #[error("Logger error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },

    #[error("Metrics exporter error: {message} {location}")]
    Metrics {
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to bind {addr}: {source} {location}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Server error: {source} {location}")]
    Serve {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },
}

pub type Result<T> = std::result::Result<T, ServerError>;
