//! Exponential backoff.

use super::strategy::BackoffStrategy;
use super::validate;
use crate::delay::duration_from_millis;
use crate::error::Result;
use std::time::Duration;

/// Exponential backoff strategy.
///
/// Delays double with every retry, capped at `cap`.
///
/// # Mathematical Formula
///
/// For attempt `n` (0-indexed, counted per `next_backoff` call):
/// ```text
/// delay = min(cap, base * 2^n)
/// ```
///
/// The doubling is done in `f64`; after roughly a thousand calls the
/// uncapped value becomes infinite, which the cap (if any) absorbs.
///
/// # Examples
///
/// ```rust
/// use rebound::backoff::{BackoffStrategy, ExponentialBackoff};
/// use std::time::Duration;
///
/// let mut backoff = ExponentialBackoff::builder()
///     .base(100.0)
///     .cap(500.0)
///     .build()
///     .unwrap();
///
/// let delays: Vec<_> = (0..5).map(|_| backoff.next_backoff().unwrap()).collect();
/// assert_eq!(delays, [100, 200, 400, 500, 500].map(Duration::from_millis));
/// ```
///
/// # Performance Characteristics
///
/// - **Memory**: O(1) - a single attempt counter
/// - **CPU**: O(1) per call - one `powi` and a `min`
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialBackoff {
    base: f64,
    cap: f64,
    attempt: u32,
}

impl ExponentialBackoff {
    /// Create a new builder for configuring exponential backoff.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rebound::backoff::ExponentialBackoff;
    ///
    /// let backoff = ExponentialBackoff::builder()
    ///     .base(100.0)
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder() -> ExponentialBackoffBuilder {
        ExponentialBackoffBuilder::default()
    }
}

impl BackoffStrategy for ExponentialBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        let delay = capped_exponential(self.base, self.cap, self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        Some(duration_from_millis(delay))
    }

    fn reset(&mut self) {
        self.attempt = 0;
    }
}

/// `min(cap, base * 2^attempt)` in milliseconds.
///
/// A zero base stays zero for every attempt; `0 * 2^n` would turn into NaN
/// once `2^n` overflows.
pub(crate) fn capped_exponential(base: f64, cap: f64, attempt: u32) -> f64 {
    if base == 0.0 {
        return 0.0;
    }
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    (base * 2f64.powi(exponent)).min(cap)
}

/// Builder for configuring [`ExponentialBackoff`]. All values are milliseconds.
///
/// # Examples
///
/// ```rust
/// use rebound::backoff::ExponentialBackoff;
///
/// let backoff = ExponentialBackoff::builder()
///     .base(250.0)
///     .cap(30_000.0)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct ExponentialBackoffBuilder {
    base: Option<f64>,
    cap: Option<f64>,
}

impl ExponentialBackoffBuilder {
    /// Set the delay before the first retry. Required.
    pub fn base(mut self, base: f64) -> Self {
        self.base = Some(base);
        self
    }

    /// Set the maximum delay between retries.
    ///
    /// Default: unbounded
    pub fn cap(mut self, cap: f64) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Validate the parameters and build the `ExponentialBackoff` instance.
    pub fn build(self) -> Result<ExponentialBackoff> {
        let base = validate::non_negative("base", validate::required("base", self.base)?)?;
        let cap = validate::cap(self.cap.unwrap_or(f64::INFINITY))?;
        validate::cap_at_least(cap, "base", base)?;

        Ok(ExponentialBackoff {
            base,
            cap,
            attempt: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackoffError;

    #[test]
    fn test_exponential_delay_calculation() {
        let mut backoff = ExponentialBackoff::builder().base(100.0).build().unwrap();

        // 100ms * 2^0, 2^1, 2^2, 2^3
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(100)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(200)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(400)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(800)));
    }

    #[test]
    fn test_cap() {
        let mut backoff = ExponentialBackoff::builder()
            .base(100.0)
            .cap(500.0)
            .build()
            .unwrap();

        let delays: Vec<_> = (0..6).map(|_| backoff.next_backoff().unwrap()).collect();
        assert_eq!(
            delays,
            [100, 200, 400, 500, 500, 500].map(Duration::from_millis)
        );
    }

    #[test]
    fn test_cap_holds_for_long_sequences() {
        let mut backoff = ExponentialBackoff::builder()
            .base(1.0)
            .cap(5_000.0)
            .build()
            .unwrap();

        for attempt in 0..2_000 {
            let delay = backoff.next_backoff().unwrap();
            assert!(
                delay <= Duration::from_secs(5),
                "Delay at attempt {} ({:?}) exceeded cap",
                attempt,
                delay
            );
        }
    }

    #[test]
    fn test_uncapped_growth_saturates() {
        let mut backoff = ExponentialBackoff::builder().base(1.0).build().unwrap();
        let last = (0..1_100).filter_map(|_| backoff.next_backoff()).last();
        assert_eq!(last, Some(Duration::MAX));
    }

    #[test]
    fn test_zero_base_stays_zero_past_overflow() {
        let mut uncapped = ExponentialBackoff::builder().base(0.0).build().unwrap();
        let mut capped = ExponentialBackoff::builder()
            .base(0.0)
            .cap(500.0)
            .build()
            .unwrap();

        for attempt in 0..1_100 {
            assert_eq!(uncapped.next_backoff(), Some(Duration::ZERO), "attempt {attempt}");
            assert_eq!(capped.next_backoff(), Some(Duration::ZERO), "attempt {attempt}");
        }
    }

    #[test]
    fn test_reset() {
        let mut backoff = ExponentialBackoff::builder().base(10.0).build().unwrap();
        backoff.next_backoff();
        backoff.next_backoff();
        backoff.reset();
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn test_builder_validation() {
        assert_eq!(
            ExponentialBackoff::builder().build(),
            Err(BackoffError::Missing("base"))
        );
        assert!(ExponentialBackoff::builder().base(f64::NAN).build().is_err());
        assert!(ExponentialBackoff::builder().base(-1.0).build().is_err());
        assert!(ExponentialBackoff::builder()
            .base(10.0)
            .cap(f64::NAN)
            .build()
            .is_err());
        assert!(matches!(
            ExponentialBackoff::builder().base(100.0).cap(10.0).build(),
            Err(BackoffError::CapBelowBase { .. })
        ));
    }
}
