//! The cancellable wait primitive.
//!
//! [`wait`] is the only place a retry sequence sleeps. It checks the
//! cancellation handle and the delay bound before arming a timer, then races
//! the timer against the handle's listener.

use crate::cancel::CancellationHandle;
use crate::error::{DelayOutOfRange, WaitError};
use std::time::Duration;

/// The longest delay [`wait`] will arm: 2^31 − 1 milliseconds (about 24.8 days).
pub const MAX_DELAY: Duration = Duration::from_millis(2_147_483_647);

/// Wait for `duration`, or until `cancel` fires.
///
/// - If `cancel` is already cancelled, fails with its reason on the first
///   poll without creating a timer.
/// - If `duration` exceeds [`MAX_DELAY`], fails with [`DelayOutOfRange`] on the
///   first poll without creating a timer.
/// - Otherwise sleeps. If the handle fires first, the timer is dropped and the
///   wait fails with the cancellation reason. Both the timer and the listener
///   are released when this future completes or is dropped.
///
/// A zero duration completes on the next timer tick.
///
/// # Examples
///
/// ```rust
/// use rebound::cancel::CancelToken;
/// use rebound::delay::wait;
/// use rebound::error::WaitError;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let token = CancelToken::new();
/// token.cancel("shutdown");
///
/// let result = wait(Duration::from_secs(60), Some(&token)).await;
/// assert_eq!(result, Err(WaitError::Cancelled("shutdown")));
/// # }
/// ```
pub async fn wait<C>(duration: Duration, cancel: Option<&C>) -> Result<(), WaitError<C::Reason>>
where
    C: CancellationHandle + ?Sized,
{
    if let Some(reason) = cancel.and_then(|handle| handle.reason()) {
        return Err(WaitError::Cancelled(reason));
    }

    check_bounds(duration)?;

    match cancel {
        Some(handle) => {
            tokio::select! {
                biased;
                reason = handle.cancelled() => Err(WaitError::Cancelled(reason)),
                () = tokio::time::sleep(duration) => Ok(()),
            }
        }
        None => {
            tokio::time::sleep(duration).await;
            Ok(())
        }
    }
}

/// Reject delays longer than [`MAX_DELAY`].
pub fn check_bounds(duration: Duration) -> Result<(), DelayOutOfRange> {
    if duration > MAX_DELAY {
        return Err(DelayOutOfRange {
            max: MAX_DELAY,
            requested: duration,
        });
    }
    Ok(())
}

/// Convert a delay in milliseconds to a [`Duration`].
///
/// Negative values and NaN map to zero. Values too large for a `Duration`
/// (including infinity) saturate at [`Duration::MAX`]. Fractional milliseconds
/// are rounded to the nearest nanosecond.
///
/// # Examples
///
/// ```rust
/// use rebound::delay::duration_from_millis;
/// use std::time::Duration;
///
/// assert_eq!(duration_from_millis(250.0), Duration::from_millis(250));
/// assert_eq!(duration_from_millis(-5.0), Duration::ZERO);
/// assert_eq!(duration_from_millis(f64::INFINITY), Duration::MAX);
/// ```
pub fn duration_from_millis(millis: f64) -> Duration {
    if millis.is_nan() || millis <= 0.0 {
        return Duration::ZERO;
    }
    let nanos = (millis * 1_000_000.0).round();
    if nanos >= u64::MAX as f64 {
        return Duration::MAX;
    }
    Duration::from_nanos(nanos as u64)
}
