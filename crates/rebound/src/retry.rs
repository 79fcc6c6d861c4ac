//! The retry loop.
//!
//! [`Retry`] drives an operation until it succeeds, the strategy stops, a stop
//! predicate gives up, or the cancellation handle fires. [`retry`] is the
//! shorthand for the common case without predicate or handle.
//!
//! # Examples
//!
//! ```rust
//! use rebound::backoff::{BackoffStrategyExt, ExponentialBackoff};
//! use rebound::retry;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut backoff = ExponentialBackoff::builder()
//!     .base(100.0)
//!     .cap(2_000.0)
//!     .build()?
//!     .with_retry_limit(3);
//!
//! let value = retry(&mut backoff, || async {
//!     // Your operation here
//!     Ok::<_, std::io::Error>(42)
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

use crate::backoff::BackoffStrategy;
use crate::cancel::{CancellationHandle, NoCancel};
use crate::delay;
use crate::error::{RetryError, WaitError};
use std::convert::Infallible;
use std::future::Future;

/// Decides whether to give up after a failure.
///
/// Receives the error and the zero-based attempt index (`0` for the first
/// failure). Any `FnMut(&E, u32) -> bool` is a predicate.
pub trait StopPredicate<E> {
    /// Return `true` to end the retry sequence with `error`.
    fn should_stop(&mut self, error: &E, attempt: u32) -> bool;
}

impl<E, F> StopPredicate<E> for F
where
    F: FnMut(&E, u32) -> bool,
{
    fn should_stop(&mut self, error: &E, attempt: u32) -> bool {
        self(error, attempt)
    }
}

/// The default predicate: never stop early.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverStop;

impl<E> StopPredicate<E> for NeverStop {
    fn should_stop(&mut self, _error: &E, _attempt: u32) -> bool {
        false
    }
}

/// A configured retry sequence.
///
/// The strategy is borrowed mutably for the whole sequence, so one instance
/// can never drive two concurrent sequences.
///
/// # Loop
///
/// 1. Reset the strategy.
/// 2. Run the operation; success ends the sequence.
/// 3. Ask the strategy for a delay; `None` ends with the operation error.
/// 4. Ask the stop predicate; `true` ends with the operation error and the
///    delay is discarded.
/// 5. Wait for the delay, honoring the cancellation handle, then go to 2.
///
/// There is no built-in attempt limit: bound the sequence with
/// [`RetryLimit`](crate::backoff::RetryLimit), a strategy that eventually
/// stops, a stop predicate, or a cancellation handle.
///
/// # Examples
///
/// ```rust
/// use rebound::backoff::ConstantBackoff;
/// use rebound::cancel::CancelToken;
/// use rebound::Retry;
///
/// # async fn example() {
/// let mut backoff = ConstantBackoff::new(10.0).unwrap();
/// let token = CancelToken::<&str>::new();
///
/// let result = Retry::new(&mut backoff)
///     .stop_if(|err: &std::io::Error, attempt| {
///         err.kind() == std::io::ErrorKind::PermissionDenied || attempt >= 4
///     })
///     .cancel_on(&token)
///     .run(|| async { Err::<(), _>(std::io::Error::other("flaky")) })
///     .await;
///
/// assert!(result.is_err());
/// # }
/// ```
pub struct Retry<'a, S: ?Sized, P = NeverStop, C: ?Sized = NoCancel> {
    strategy: &'a mut S,
    stop: P,
    cancel: Option<&'a C>,
}

impl<'a, S> Retry<'a, S>
where
    S: BackoffStrategy + ?Sized,
{
    /// Start configuring a sequence driven by `strategy`.
    pub fn new(strategy: &'a mut S) -> Self {
        Self {
            strategy,
            stop: NeverStop,
            cancel: None,
        }
    }
}

impl<'a, S, P, C> Retry<'a, S, P, C>
where
    S: ?Sized,
    C: ?Sized,
{
    /// Give up early when `predicate(error, attempt)` returns `true`.
    pub fn stop_if<E, Q>(self, predicate: Q) -> Retry<'a, S, Q, C>
    where
        Q: FnMut(&E, u32) -> bool,
    {
        Retry {
            strategy: self.strategy,
            stop: predicate,
            cancel: self.cancel,
        }
    }

    /// Abort pending waits when `handle` is cancelled.
    ///
    /// An operation that is already running is not interrupted; the
    /// cancellation is observed at the next wait.
    pub fn cancel_on<D>(self, handle: &'a D) -> Retry<'a, S, P, D>
    where
        D: CancellationHandle + ?Sized,
    {
        Retry {
            strategy: self.strategy,
            stop: self.stop,
            cancel: Some(handle),
        }
    }
}

impl<S, P, C> Retry<'_, S, P, C>
where
    S: BackoffStrategy + ?Sized,
    C: CancellationHandle + ?Sized,
{
    /// Run `operation` until the sequence ends.
    ///
    /// A synchronous operation can be adapted with [`std::future::ready`]:
    /// `|| std::future::ready(do_work())`.
    ///
    /// # Returns
    /// - `Ok(T)`: the first successful result
    /// - `Err(RetryError::Operation(e))`: the most recent operation error, when
    ///   the strategy or the stop predicate ended the sequence
    /// - `Err(RetryError::Cancelled(reason))`: a wait was cancelled
    /// - `Err(RetryError::Delay(_))`: the strategy produced a delay longer than
    ///   [`MAX_DELAY`](crate::delay::MAX_DELAY)
    pub async fn run<F, Fut, T, E>(self, mut operation: F) -> Result<T, RetryError<E, C::Reason>>
    where
        P: StopPredicate<E>,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Self {
            strategy,
            mut stop,
            cancel,
        } = self;

        strategy.reset();
        // Zero-based index of the current failure; logged as the failure count.
        let mut attempt: u32 = 0;

        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            let Some(delay) = strategy.next_backoff() else {
                tracing::debug!(
                    failures = attempt.saturating_add(1),
                    "backoff strategy stopped retrying"
                );
                return Err(RetryError::Operation(err));
            };

            let give_up = stop.should_stop(&err, attempt);
            attempt = attempt.saturating_add(1);
            if give_up {
                tracing::debug!(failures = attempt, "stop predicate ended retry sequence");
                return Err(RetryError::Operation(err));
            }
            drop(err);

            tracing::debug!(
                failures = attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "operation failed, retrying after delay"
            );

            if let Err(err) = delay::wait(delay, cancel).await {
                tracing::debug!(
                    failures = attempt,
                    cancelled = matches!(err, WaitError::Cancelled(_)),
                    "retry wait aborted"
                );
                return Err(RetryError::from_wait(err));
            }
        }
    }
}

/// Retry `operation` with `strategy` and no predicate or cancellation.
///
/// Equivalent to `Retry::new(strategy).run(operation)`.
pub async fn retry<S, F, Fut, T, E>(
    strategy: &mut S,
    operation: F,
) -> Result<T, RetryError<E, Infallible>>
where
    S: BackoffStrategy + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    Retry::new(strategy).run(operation).await
}
