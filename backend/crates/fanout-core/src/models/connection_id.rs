use crate::{CoreError, ErrorLocation, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Random bytes behind a generated identifier (16 base64 characters)
const GENERATED_ID_BYTES: usize = 12;

/// Longest identifier accepted from a transport
pub const MAX_CONNECTION_ID_LENGTH: usize = 128;

/// Opaque identifier assigned by the transport to one live connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Generate a fresh identifier for a newly accepted connection
    pub fn generate() -> Self {
        let bytes: [u8; GENERATED_ID_BYTES] = rand::random();
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Validate an identifier handed over by a transport or read from the registry
    #[track_caller]
    pub fn parse(value: &str) -> CoreErrorResult<Self> {
        if value.is_empty() {
            return Err(CoreError::InvalidConnectionId {
                message: "connection id cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if value.len() > MAX_CONNECTION_ID_LENGTH {
            return Err(CoreError::InvalidConnectionId {
                message: format!(
                    "connection id exceeds {} bytes ({})",
                    MAX_CONNECTION_ID_LENGTH,
                    value.len()
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if value.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(CoreError::InvalidConnectionId {
                message: format!("connection id contains whitespace or control characters: {value:?}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ConnectionId {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = CoreError;

    #[track_caller]
    fn try_from(value: String) -> CoreErrorResult<Self> {
        Self::parse(&value)
    }
}

impl From<ConnectionId> for String {
    fn from(id: ConnectionId) -> Self {
        id.0
    }
}

impl AsRef<str> for ConnectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
