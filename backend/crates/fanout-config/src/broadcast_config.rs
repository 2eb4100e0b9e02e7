use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_MAX_IN_FLIGHT: usize = 1;
pub const MAX_MAX_IN_FLIGHT: usize = 4096;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Deliveries of one scan page allowed to run at the same time
    pub max_in_flight: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

impl BroadcastConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !(MIN_MAX_IN_FLIGHT..=MAX_MAX_IN_FLIGHT).contains(&self.max_in_flight) {
            return Err(ConfigError::broadcast(format!(
                "broadcast.max_in_flight must be {}-{}, got {}",
                MIN_MAX_IN_FLIGHT, MAX_MAX_IN_FLIGHT, self.max_in_flight
            )));
        }

        Ok(())
    }
}
