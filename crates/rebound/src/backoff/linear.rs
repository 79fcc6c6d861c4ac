//! Linearly growing delays.

use super::strategy::BackoffStrategy;
use super::validate;
use crate::delay::duration_from_millis;
use crate::error::Result;
use std::time::Duration;

/// Delays grow by a fixed increment: `min(cap, initial_delay + increment * n)`.
///
/// # Examples
///
/// ```rust
/// use rebound::backoff::{BackoffStrategy, LinearBackoff};
/// use std::time::Duration;
///
/// let mut backoff = LinearBackoff::builder()
///     .initial_delay(100.0)
///     .increment(50.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(100)));
/// assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(150)));
/// assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(200)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearBackoff {
    initial_delay: f64,
    increment: f64,
    cap: f64,
    attempt: u32,
}

impl LinearBackoff {
    /// Create a new builder for configuring linear backoff.
    pub fn builder() -> LinearBackoffBuilder {
        LinearBackoffBuilder::default()
    }
}

impl BackoffStrategy for LinearBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        let delay = self.initial_delay + self.increment * f64::from(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        Some(duration_from_millis(delay.min(self.cap)))
    }

    fn reset(&mut self) {
        self.attempt = 0;
    }
}

/// Builder for [`LinearBackoff`]. All values are milliseconds.
#[derive(Debug, Default)]
pub struct LinearBackoffBuilder {
    initial_delay: Option<f64>,
    increment: Option<f64>,
    cap: Option<f64>,
}

impl LinearBackoffBuilder {
    /// Delay for the first retry. Default: 0
    pub fn initial_delay(mut self, delay: f64) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Amount added for every subsequent retry. Required.
    pub fn increment(mut self, increment: f64) -> Self {
        self.increment = Some(increment);
        self
    }

    /// Upper bound for any delay. Default: unbounded
    pub fn cap(mut self, cap: f64) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Validate the parameters and build the strategy.
    pub fn build(self) -> Result<LinearBackoff> {
        let initial_delay = validate::non_negative("initial_delay", self.initial_delay.unwrap_or(0.0))?;
        let increment = validate::non_negative(
            "increment",
            validate::required("increment", self.increment)?,
        )?;
        let cap = validate::cap(self.cap.unwrap_or(f64::INFINITY))?;
        validate::cap_at_least(cap, "initial_delay", initial_delay)?;

        Ok(LinearBackoff {
            initial_delay,
            increment,
            cap,
            attempt: 0,
        })
    }
}
