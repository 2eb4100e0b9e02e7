use std::panic::Location;
use std::path::PathBuf;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ConfigError {
    #[error("{section} config error: {message} {location}")]
    Invalid {
        section: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[track_caller]
    fn invalid(section: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            section,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::invalid("Config", message)
    }

    #[track_caller]
    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::invalid("Server", message)
    }

    #[track_caller]
    pub fn registry<S: Into<String>>(message: S) -> Self {
        Self::invalid("Registry", message)
    }

    #[track_caller]
    pub fn websocket<S: Into<String>>(message: S) -> Self {
        Self::invalid("WebSocket", message)
    }

    #[track_caller]
    pub fn delivery<S: Into<String>>(message: S) -> Self {
        Self::invalid("Delivery", message)
    }

    #[track_caller]
    pub fn broadcast<S: Into<String>>(message: S) -> Self {
        Self::invalid("Broadcast", message)
    }

    #[track_caller]
    pub fn cleanup<S: Into<String>>(message: S) -> Self {
        Self::invalid("Cleanup", message)
    }

    #[track_caller]
    pub fn logging<S: Into<String>>(message: S) -> Self {
        Self::invalid("Logging", message)
    }
}

pub type ConfigErrorResult<T> = StdResult<T, ConfigError>;
