//! Per-venue circuit breaker
//!
//! A venue that keeps failing is skipped for a cool-down period instead of
//! being retried on every routing call. After the cool-down one probe call is
//! let through; its result closes or reopens the circuit.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use swapline_config::RouterSettings;
use tracing::{info, warn};

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CircuitState {
    /// Normal operation - calls pass through
    Closed,
    /// Failing - calls are rejected
    Open,
    /// Cool-down elapsed - a single probe is in flight
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before opening
    pub failure_threshold: u32,
    /// Time spent open before a probe is allowed
    pub recovery_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self::from(&RouterSettings::default())
    }
}

impl From<&RouterSettings> for CircuitBreakerConfig {
    fn from(settings: &RouterSettings) -> Self {
        Self {
            failure_threshold: settings.circuit_failure_threshold,
            recovery_timeout: settings.circuit_recovery(),
        }
    }
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

/// Thread-safe circuit breaker for one venue
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    inner: Mutex<BreakerState>,
    config: CircuitBreakerConfig,

    // Metrics
    total_calls: AtomicU64,
    total_failures: AtomicU64,
    circuit_opens: AtomicU64,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                opened_at: None,
            }),
            config,
            total_calls: AtomicU64::new(0),
            total_failures: AtomicU64::new(0),
            circuit_opens: AtomicU64::new(0),
        }
    }

    /// Whether a call may go out now
    ///
    /// An open circuit whose cool-down has elapsed moves to half-open and
    /// admits exactly this caller; others keep being rejected until the probe
    /// reports back. A probe that never reports back is replaced after
    /// another cool-down.
    pub fn try_acquire(&self) -> bool {
        let mut inner = self.inner.lock();

        let admitted = match inner.state {
            CircuitState::Closed => true,
            CircuitState::Open | CircuitState::HalfOpen => {
                let cooled = inner
                    .opened_at
                    .map_or(true, |at| at.elapsed() >= self.config.recovery_timeout);
                if cooled {
                    if inner.state == CircuitState::Open {
                        info!(venue = %self.name, "Circuit breaker half-open, probing venue");
                    }
                    inner.state = CircuitState::HalfOpen;
                    inner.opened_at = Some(Instant::now());
                }
                cooled
            }
        };

        if admitted {
            self.total_calls.fetch_add(1, Ordering::Relaxed);
        }
        admitted
    }

    pub fn on_success(&self) {
        let mut inner = self.inner.lock();

        if inner.state == CircuitState::HalfOpen {
            info!(venue = %self.name, "Circuit breaker closed after successful probe");
        }
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.opened_at = None;
    }

    /// The venue answered but could not serve this particular request
    ///
    /// Leaves the failure count alone. A half-open probe that gets such an
    /// answer has still shown the venue is up, so the circuit closes.
    pub fn on_neutral(&self) {
        let mut inner = self.inner.lock();

        if inner.state == CircuitState::HalfOpen {
            info!(venue = %self.name, "Circuit breaker closed, probe reached the venue");
            inner.state = CircuitState::Closed;
            inner.consecutive_failures = 0;
            inner.opened_at = None;
        }
    }

    pub fn on_failure(&self) {
        let mut inner = self.inner.lock();
        self.total_failures.fetch_add(1, Ordering::Relaxed);
        inner.consecutive_failures += 1;

        let should_open = match inner.state {
            CircuitState::Closed => inner.consecutive_failures >= self.config.failure_threshold,
            CircuitState::HalfOpen => true,
            CircuitState::Open => false,
        };

        if should_open {
            inner.state = CircuitState::Open;
            inner.opened_at = Some(Instant::now());
            self.circuit_opens.fetch_add(1, Ordering::Relaxed);
            warn!(
                venue = %self.name,
                failures = inner.consecutive_failures,
                "Circuit breaker opened"
            );
        }
    }

    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    pub fn metrics(&self) -> CircuitBreakerMetrics {
        CircuitBreakerMetrics {
            total_calls: self.total_calls.load(Ordering::Relaxed),
            total_failures: self.total_failures.load(Ordering::Relaxed),
            circuit_opens: self.circuit_opens.load(Ordering::Relaxed),
            consecutive_failures: self.inner.lock().consecutive_failures,
        }
    }

    /// Force the circuit closed, e.g. after an operator fixed the venue
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        if inner.state != CircuitState::Closed {
            info!(venue = %self.name, "Circuit breaker reset");
        }
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.opened_at = None;
    }
}

/// Metrics for circuit breaker monitoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitBreakerMetrics {
    pub total_calls: u64,
    pub total_failures: u64,
    pub circuit_opens: u64,
    pub consecutive_failures: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn breaker(threshold: u32, recovery: Duration) -> CircuitBreaker {
        CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                failure_threshold: threshold,
                recovery_timeout: recovery,
            },
        )
    }

    #[test]
    fn test_opens_after_threshold() {
        let breaker = breaker(3, Duration::from_secs(60));

        for _ in 0..2 {
            assert!(breaker.try_acquire());
            breaker.on_failure();
        }
        assert_eq!(breaker.state(), CircuitState::Closed);

        assert!(breaker.try_acquire());
        breaker.on_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
        assert!(!breaker.try_acquire());

        let metrics = breaker.metrics();
        assert_eq!(metrics.total_calls, 3);
        assert_eq!(metrics.total_failures, 3);
        assert_eq!(metrics.circuit_opens, 1);
    }

    #[test]
    fn test_success_resets_failure_count() {
        let breaker = breaker(2, Duration::from_secs(60));

        breaker.on_failure();
        breaker.on_success();
        breaker.on_failure();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(breaker.metrics().consecutive_failures, 1);
    }

    #[test]
    fn test_half_open_probe() {
        let breaker = breaker(1, Duration::from_millis(10));

        breaker.on_failure();
        assert!(!breaker.try_acquire());

        thread::sleep(Duration::from_millis(20));
        assert!(breaker.try_acquire());
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        // Only the probe gets through
        assert!(!breaker.try_acquire());

        breaker.on_failure();
        assert_eq!(breaker.state(), CircuitState::Open);

        thread::sleep(Duration::from_millis(20));
        assert!(breaker.try_acquire());
        breaker.on_success();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert!(breaker.try_acquire());
        assert_eq!(breaker.metrics().circuit_opens, 2);
    }

    #[test]
    fn test_neutral_outcomes_do_not_count() {
        let breaker = breaker(2, Duration::from_millis(10));

        breaker.on_failure();
        for _ in 0..5 {
            assert!(breaker.try_acquire());
            breaker.on_neutral();
        }
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(breaker.metrics().consecutive_failures, 1);
        assert_eq!(breaker.metrics().total_failures, 1);

        breaker.on_failure();
        assert_eq!(breaker.state(), CircuitState::Open);

        thread::sleep(Duration::from_millis(20));
        assert!(breaker.try_acquire());
        breaker.on_neutral();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(breaker.metrics().consecutive_failures, 0);
    }

    #[test]
    fn test_reset_closes_open_circuit() {
        let breaker = breaker(1, Duration::from_secs(60));

        breaker.on_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
        assert!(!breaker.try_acquire());

        breaker.reset();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(breaker.metrics().consecutive_failures, 0);
        assert!(breaker.try_acquire());
        // Lifetime metrics survive a reset
        assert_eq!(breaker.metrics().circuit_opens, 1);
    }

    #[test]
    fn test_config_from_router_settings() {
        let settings = RouterSettings {
            circuit_failure_threshold: 7,
            circuit_recovery_ms: 1_000,
            ..RouterSettings::default()
        };
        let config = CircuitBreakerConfig::from(&settings);
        assert_eq!(config.failure_threshold, 7);
        assert_eq!(config.recovery_timeout, Duration::from_secs(1));
    }
}
