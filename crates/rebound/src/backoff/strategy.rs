//! The strategy contract shared by every backoff formula.

use super::limit::RetryLimit;
use std::time::Duration;

/// A policy that computes successive retry delays.
///
/// Implementations own their progression state (attempt counters, previous
/// delays). The retry loop and [`RetryLimit`] depend only on this trait, never
/// on a concrete formula.
///
/// # Contract
///
/// - [`next_backoff`](Self::next_backoff) returns `Some(delay)` for the wait
///   before the next attempt, or `None` to signal that no further attempts
///   should be made. It advances internal state and never panics once the
///   strategy was constructed from valid parameters.
/// - [`reset`](Self::reset) restores the exact state the strategy had right
///   after construction. Calling it repeatedly is the same as calling it once.
///
/// A strategy instance is not meant to be shared between concurrent retry
/// sequences; the loop borrows it mutably for the whole sequence.
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
/// assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(100)));
/// assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(200)));
///
/// backoff.reset();
/// assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(100)));
/// ```
pub trait BackoffStrategy: Send {
    /// Compute the delay before the next retry, or `None` to stop retrying.
    fn next_backoff(&mut self) -> Option<Duration>;

    /// Restore the post-construction state.
    fn reset(&mut self);
}

impl<S> BackoffStrategy for Box<S>
where
    S: BackoffStrategy + ?Sized,
{
    fn next_backoff(&mut self) -> Option<Duration> {
        (**self).next_backoff()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

impl<S> BackoffStrategy for &mut S
where
    S: BackoffStrategy + ?Sized,
{
    fn next_backoff(&mut self) -> Option<Duration> {
        (**self).next_backoff()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Adapters available on every [`BackoffStrategy`].
pub trait BackoffStrategyExt: BackoffStrategy + Sized {
    /// Allow at most `retries` delays before stopping.
    ///
    /// ```rust
    /// use rebound::backoff::{BackoffStrategy, BackoffStrategyExt, ConstantBackoff};
    ///
    /// let mut backoff = ConstantBackoff::new(1000.0).unwrap().with_retry_limit(1);
    /// assert!(backoff.next_backoff().is_some());
    /// assert!(backoff.next_backoff().is_none());
    /// ```
    fn with_retry_limit(self, retries: u32) -> RetryLimit<Self> {
        RetryLimit::new(self, retries)
    }

    /// Erase the concrete type.
    fn boxed(self) -> Box<dyn BackoffStrategy>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<S: BackoffStrategy> BackoffStrategyExt for S {}
