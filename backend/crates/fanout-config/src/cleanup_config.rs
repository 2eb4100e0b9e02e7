use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_QUEUE_CAPACITY: usize = 1;
pub const MAX_QUEUE_CAPACITY: usize = 100_000;
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

pub const MIN_WORKERS: usize = 1;
pub const MAX_WORKERS: usize = 64;
pub const DEFAULT_WORKERS: usize = 2;

pub const MIN_FAILURE_THRESHOLD: u32 = 1;
pub const MAX_FAILURE_THRESHOLD: u32 = 1000;
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 10;

pub const MIN_OPEN_DURATION_SECS: u64 = 1;
pub const MAX_OPEN_DURATION_SECS: u64 = 3600;
pub const DEFAULT_OPEN_DURATION_SECS: u64 = 30;

/// Escalation for repeated failed deletes of stale connections.
/// Disabled by default: failures are only logged.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanupCircuitBreakerConfig {
    pub enabled: bool,
    /// Consecutive failed deletes that open the circuit
    pub failure_threshold: u32,
    /// Seconds deletes are skipped once the circuit is open
    pub open_duration_secs: u64,
}

impl Default for CleanupCircuitBreakerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            open_duration_secs: DEFAULT_OPEN_DURATION_SECS,
        }
    }
}

/// Background removal of connections a broadcast found to be gone.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    pub queue_capacity: usize,
    pub workers: usize,
    pub circuit_breaker: CleanupCircuitBreakerConfig,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            workers: DEFAULT_WORKERS,
            circuit_breaker: CleanupCircuitBreakerConfig::default(),
        }
    }
}

impl CleanupConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !(MIN_QUEUE_CAPACITY..=MAX_QUEUE_CAPACITY).contains(&self.queue_capacity) {
            return Err(ConfigError::cleanup(format!(
                "cleanup.queue_capacity must be {}-{}, got {}",
                MIN_QUEUE_CAPACITY, MAX_QUEUE_CAPACITY, self.queue_capacity
            )));
        }

        if !(MIN_WORKERS..=MAX_WORKERS).contains(&self.workers) {
            return Err(ConfigError::cleanup(format!(
                "cleanup.workers must be {}-{}, got {}",
                MIN_WORKERS, MAX_WORKERS, self.workers
            )));
        }

        let breaker = &self.circuit_breaker;
        if !(MIN_FAILURE_THRESHOLD..=MAX_FAILURE_THRESHOLD).contains(&breaker.failure_threshold) {
            return Err(ConfigError::cleanup(format!(
                "cleanup.circuit_breaker.failure_threshold must be {}-{}, got {}",
                MIN_FAILURE_THRESHOLD, MAX_FAILURE_THRESHOLD, breaker.failure_threshold
            )));
        }

        if !(MIN_OPEN_DURATION_SECS..=MAX_OPEN_DURATION_SECS).contains(&breaker.open_duration_secs)
        {
            return Err(ConfigError::cleanup(format!(
                "cleanup.circuit_breaker.open_duration_secs must be {}-{}, got {}",
                MIN_OPEN_DURATION_SECS, MAX_OPEN_DURATION_SECS, breaker.open_duration_secs
            )));
        }

        Ok(())
    }
}
