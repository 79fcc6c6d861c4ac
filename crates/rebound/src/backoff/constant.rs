//! Stateless strategies: a fixed delay, no delay, and no retries at all.

use super::strategy::BackoffStrategy;
use super::validate;
use crate::delay::duration_from_millis;
use crate::error::Result;
use std::time::Duration;

/// Always waits the same amount of time.
///
/// ```rust
/// use rebound::backoff::{BackoffStrategy, ConstantBackoff};
/// use std::time::Duration;
///
/// let mut backoff = ConstantBackoff::new(1000.0).unwrap();
/// assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(1)));
/// assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(1)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantBackoff {
    delay: Duration,
}

impl ConstantBackoff {
    /// Create a constant backoff of `delay` milliseconds.
    ///
    /// Fails if `delay` is NaN, infinite, or negative.
    pub fn new(delay: f64) -> Result<Self> {
        let delay = validate::non_negative("delay", delay)?;
        Ok(Self {
            delay: duration_from_millis(delay),
        })
    }

    /// The configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl BackoffStrategy for ConstantBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        Some(self.delay)
    }

    fn reset(&mut self) {}
}

/// Retries immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroBackoff;

impl BackoffStrategy for ZeroBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        Some(Duration::ZERO)
    }

    fn reset(&mut self) {}
}

/// Never retries: every call signals stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopBackoff;

impl BackoffStrategy for StopBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        None
    }

    fn reset(&mut self) {}
}
