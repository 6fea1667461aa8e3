//! # Circuit Breaker Module
//!
//! This module implements the circuit breaker pattern for recipe source calls.
//! When the source fails repeatedly, calls fail fast instead of piling up
//! retries against a service that is down.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::recipe_config::FetchConfig;

#[derive(Debug, Default)]
struct BreakerState {
    failure_count: u32,
    last_failure_time: Option<Instant>,
}

/// Circuit breaker for recipe source calls
///
/// # State Machine
///
/// - **Closed**: Normal operation, requests pass through
/// - **Open**: Failure threshold exceeded, requests fail fast
/// - **Half-Open**: Reset timeout elapsed, the next request is let through
///
/// # Configuration
///
/// Uses `FetchConfig` for:
/// - `circuit_breaker_threshold`: Consecutive failures before opening (default: 5)
/// - `circuit_breaker_reset_secs`: Time before attempting reset (default: 60s)
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    threshold: u32,
    reset_after: Duration,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fridge_recipes::circuit_breaker::CircuitBreaker;
    /// use fridge_recipes::recipe_config::FetchConfig;
    ///
    /// let breaker = CircuitBreaker::new(&FetchConfig::default());
    /// assert!(!breaker.is_open());
    /// ```
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            state: Mutex::new(BreakerState::default()),
            threshold: config.circuit_breaker_threshold,
            reset_after: Duration::from_secs(config.circuit_breaker_reset_secs),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Check if the circuit is open (blocking requests)
    ///
    /// Returns `true` while the failure count is at or above the threshold and the
    /// reset timeout has not elapsed. Once it has, the breaker half-opens: the
    /// counter is cleared and requests pass again.
    pub fn is_open(&self) -> bool {
        let mut state = self.lock();

        if state.failure_count >= self.threshold {
            if let Some(last_time) = state.last_failure_time {
                if last_time.elapsed() < self.reset_after {
                    return true;
                }
                *state = BreakerState::default();
            }
        }
        false
    }

    /// Record a failed call
    pub fn record_failure(&self) {
        let mut state = self.lock();
        state.failure_count += 1;
        state.last_failure_time = Some(Instant::now());
    }

    /// Record a successful call, closing the circuit
    pub fn record_success(&self) {
        *self.lock() = BreakerState::default();
    }

    /// Current consecutive failure count
    pub fn failure_count(&self) -> u32 {
        self.lock().failure_count
    }
}
