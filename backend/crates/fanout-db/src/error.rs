use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLx error: {source} {location}")]
    Sqlx {
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("Registry initialization failed: {message} {location}")]
    Initialization {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid registry table name {table_name:?} {location}")]
    InvalidTableName {
        table_name: String,
        location: ErrorLocation,
    },
}

impl From<sqlx::Error> for DbError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        Self::Sqlx {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl DbError {
    /// Description without the source location, suitable for response bodies
    pub fn cause(&self) -> String {
        match self {
            Self::Sqlx { source, .. } => source.to_string(),
            Self::Initialization { message, .. } => message.clone(),
            Self::InvalidTableName { table_name, .. } => {
                format!("invalid registry table name {table_name:?}")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
