//! Fibonacci backoff.

use super::strategy::BackoffStrategy;
use super::validate;
use crate::delay::duration_from_millis;
use crate::error::Result;
use std::time::Duration;

/// Delays follow the Fibonacci sequence scaled by `base`, capped at `cap`.
///
/// ```text
/// delay(n) = min(cap, base * fib(n)),  fib = 1, 1, 2, 3, 5, 8, ...
/// ```
///
/// The sequence is carried as two `f64` values. Precision degrades only after
/// about 90 calls, far beyond any realistic cap.
///
/// # Examples
///
/// ```rust
/// use rebound::backoff::{BackoffStrategy, FibonacciBackoff};
/// use std::time::Duration;
///
/// let mut backoff = FibonacciBackoff::builder()
///     .base(100.0)
///     .cap(10_000.0)
///     .build()
///     .unwrap();
///
/// let delays: Vec<_> = (0..8).map(|_| backoff.next_backoff().unwrap()).collect();
/// assert_eq!(
///     delays,
///     [100, 100, 200, 300, 500, 800, 1300, 2100].map(Duration::from_millis)
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FibonacciBackoff {
    base: f64,
    cap: f64,
    previous: f64,
    current: f64,
}

impl FibonacciBackoff {
    /// Create a new builder for configuring Fibonacci backoff.
    pub fn builder() -> FibonacciBackoffBuilder {
        FibonacciBackoffBuilder::default()
    }
}

impl BackoffStrategy for FibonacciBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        let delay = self.current.min(self.cap);
        let next = self.previous + self.current;
        self.previous = self.current;
        self.current = next;
        Some(duration_from_millis(delay))
    }

    fn reset(&mut self) {
        self.previous = 0.0;
        self.current = self.base;
    }
}

/// Builder for [`FibonacciBackoff`]. All values are milliseconds.
#[derive(Debug, Default)]
pub struct FibonacciBackoffBuilder {
    base: Option<f64>,
    cap: Option<f64>,
}

impl FibonacciBackoffBuilder {
    /// Unit of the sequence; also the first two delays. Required.
    pub fn base(mut self, base: f64) -> Self {
        self.base = Some(base);
        self
    }

    /// Upper bound for any delay. Default: unbounded
    pub fn cap(mut self, cap: f64) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Validate the parameters and build the strategy.
    pub fn build(self) -> Result<FibonacciBackoff> {
        let base = validate::non_negative("base", validate::required("base", self.base)?)?;
        let cap = validate::cap(self.cap.unwrap_or(f64::INFINITY))?;
        validate::cap_at_least(cap, "base", base)?;

        Ok(FibonacciBackoff {
            base,
            cap,
            previous: 0.0,
            current: base,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_hits_cap() {
        let mut backoff = FibonacciBackoff::builder()
            .base(100.0)
            .cap(1_000.0)
            .build()
            .unwrap();

        let delays: Vec<_> = (0..9).map(|_| backoff.next_backoff().unwrap()).collect();
        assert_eq!(
            delays,
            [100, 100, 200, 300, 500, 800, 1000, 1000, 1000].map(Duration::from_millis)
        );
    }

    #[test]
    fn test_reset_restores_sequence_start() {
        let mut backoff = FibonacciBackoff::builder().base(10.0).build().unwrap();
        for _ in 0..5 {
            backoff.next_backoff();
        }
        backoff.reset();
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(10)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(10)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn test_zero_base_stays_zero() {
        let mut backoff = FibonacciBackoff::builder().base(0.0).build().unwrap();
        for _ in 0..10 {
            assert_eq!(backoff.next_backoff(), Some(Duration::ZERO));
        }
    }

    #[test]
    fn test_rejects_cap_below_base() {
        assert!(FibonacciBackoff::builder().base(10.0).cap(5.0).build().is_err());
    }
}
