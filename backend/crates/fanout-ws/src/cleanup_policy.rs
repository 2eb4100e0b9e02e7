use fanout_config::CleanupCircuitBreakerConfig;
use fanout_core::ConnectionId;
use fanout_db::DbError;

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Decides what happens around registry cleanup deletes
pub trait CleanupPolicy: Send + Sync {
    /// Whether a delete should be attempted right now
    fn allow(&self) -> bool {
        true
    }

    fn on_success(&self, _id: &ConnectionId) {}

    fn on_failure(&self, id: &ConnectionId, error: &DbError);
}

/// Log the failure and move on; the stale row is found again next broadcast
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAndForget;

impl CleanupPolicy for LogAndForget {
    fn on_failure(&self, id: &ConnectionId, error: &DbError) {
        log::warn!("Cleanup of stale connection {id} failed: {error}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Deletes flow through
    Closed,
    /// Too many consecutive failures; deletes are skipped
    Open,
    /// One trial delete is allowed
    HalfOpen,
}

struct BreakerState {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

/// Stops hammering a failing registry with cleanup deletes.
///
/// Opens after `failure_threshold` consecutive failures, skips deletes for
/// `open_duration`, then lets a single trial through. A successful trial
/// closes the circuit; a failed one reopens it.
pub struct CircuitBreakingPolicy {
    failure_threshold: u32,
    open_duration: Duration,
    inner: Mutex<BreakerState>,
}

impl CircuitBreakingPolicy {
    pub fn new(failure_threshold: u32, open_duration: Duration) -> Self {
        Self {
            failure_threshold: failure_threshold.max(1),
            open_duration,
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                opened_at: None,
                trial_in_flight: false,
            }),
        }
    }

    pub fn from_config(config: &CleanupCircuitBreakerConfig) -> Self {
        Self::new(
            config.failure_threshold,
            Duration::from_secs(config.open_duration_secs),
        )
    }

    pub fn state(&self) -> CircuitState {
        match self.inner.lock() {
            Ok(inner) => inner.state,
            Err(poisoned) => poisoned.into_inner().state,
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut BreakerState) -> T) -> T {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    fn open(&self, inner: &mut BreakerState) {
        inner.state = CircuitState::Open;
        inner.opened_at = Some(Instant::now());
        inner.trial_in_flight = false;
    }
}

impl CleanupPolicy for CircuitBreakingPolicy {
    fn allow(&self) -> bool {
        self.with_state(|inner| match inner.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let elapsed = inner.opened_at.map(|at| at.elapsed()).unwrap_or_default();
                if elapsed >= self.open_duration {
                    inner.state = CircuitState::HalfOpen;
                    inner.trial_in_flight = true;
                    log::info!("Cleanup circuit breaker half-open, allowing a trial delete");
                    true
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => {
                if inner.trial_in_flight {
                    false
                } else {
                    inner.trial_in_flight = true;
                    true
                }
            }
        })
    }

    fn on_success(&self, _id: &ConnectionId) {
        self.with_state(|inner| {
            if inner.state != CircuitState::Closed {
                log::info!("Cleanup circuit breaker closed");
            }
            inner.state = CircuitState::Closed;
            inner.consecutive_failures = 0;
            inner.opened_at = None;
            inner.trial_in_flight = false;
        });
    }

    fn on_failure(&self, id: &ConnectionId, error: &DbError) {
        log::warn!("Cleanup of stale connection {id} failed: {error}");

        self.with_state(|inner| match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.failure_threshold {
                    self.open(inner);
                    log::warn!(
                        "Cleanup circuit breaker OPEN after {} consecutive failures",
                        inner.consecutive_failures
                    );
                }
            }
            CircuitState::HalfOpen => {
                self.open(inner);
                log::warn!("Cleanup circuit breaker reopened after failed trial delete");
            }
            CircuitState::Open => {}
        });
    }
}
