//! Bounding any strategy by a number of retries.

use super::strategy::BackoffStrategy;
use std::time::Duration;

/// Wraps a strategy and stops after `retries` delays.
///
/// Once the budget is spent, every call returns `None` without consulting
/// the inner strategy. A stop from the inner strategy passes through
/// unchanged (and still spends one retry).
///
/// # Examples
///
/// ```rust
/// use rebound::backoff::{BackoffStrategy, ConstantBackoff, RetryLimit};
/// use std::time::Duration;
///
/// let mut backoff = RetryLimit::new(ConstantBackoff::new(1000.0).unwrap(), 2);
///
/// assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(1)));
/// assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(1)));
/// assert_eq!(backoff.next_backoff(), None);
/// assert_eq!(backoff.next_backoff(), None);
/// ```
#[derive(Debug, Clone)]
pub struct RetryLimit<S> {
    inner: S,
    retries: u32,
    remaining: u32,
}

impl<S: BackoffStrategy> RetryLimit<S> {
    /// Allow at most `retries` delays from `inner`. `0` stops immediately.
    pub fn new(inner: S, retries: u32) -> Self {
        Self {
            inner,
            retries,
            remaining: retries,
        }
    }
}

impl<S> RetryLimit<S> {
    /// The configured retry budget.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Retries left before the limit forces a stop.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// The wrapped strategy.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap the inner strategy.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: BackoffStrategy> BackoffStrategy for RetryLimit<S> {
    fn next_backoff(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.inner.next_backoff()
    }

    fn reset(&mut self) {
        self.remaining = self.retries;
        self.inner.reset();
    }
}
