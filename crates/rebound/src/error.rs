//! Error types for backoff construction, delays, and retry sequences.
//!
//! Errors are split by when they can occur:
//!
//! - [`BackoffError`] is returned while *building* a strategy, never later.
//! - [`DelayOutOfRange`] is returned by the wait primitive before a timer is armed.
//! - [`WaitError`] is the outcome of a cancellable wait.
//! - [`RetryError`] is the overall failure of a retry sequence.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for strategy construction.
pub type Result<T> = std::result::Result<T, BackoffError>;

/// Invalid strategy parameters, reported at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackoffError {
    /// A numeric parameter violates its documented constraint.
    #[error("invalid {name}: {value} (expected {expected})")]
    InvalidParameter {
        /// Parameter name as it appears in the builder
        name: &'static str,
        /// The rejected value
        value: f64,
        /// Human-readable constraint, e.g. "a finite number >= 0"
        expected: &'static str,
    },

    /// The cap is smaller than the starting delay.
    #[error("cap {cap} must be greater than or equal to {base_name} {base}")]
    CapBelowBase {
        /// The configured cap
        cap: f64,
        /// Name of the parameter the cap was compared with
        base_name: &'static str,
        /// The configured starting delay
        base: f64,
    },

    /// A required builder parameter was never set.
    #[error("missing required parameter: {0}")]
    Missing(&'static str),
}

/// A requested delay exceeds the longest timer the wait primitive arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "delay of {}ms exceeds the maximum timer delay of {}ms",
    .requested.as_millis(),
    .max.as_millis()
)]
pub struct DelayOutOfRange {
    /// The maximum supported delay
    pub max: Duration,
    /// The delay that was asked for
    pub requested: Duration,
}

/// Failure of a cancellable wait.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaitError<R> {
    /// The cancellation handle fired; carries its reason.
    #[error("wait cancelled: {0:?}")]
    Cancelled(R),

    /// The duration is longer than [`crate::delay::MAX_DELAY`].
    #[error(transparent)]
    OutOfRange(#[from] DelayOutOfRange),
}

/// Overall failure of a retry sequence.
///
/// Exactly one cause is surfaced: the most recent operation error, the
/// cancellation reason, or an oversize delay produced by the strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError<E, R> {
    /// The operation failed and the sequence gave up (strategy stop or stop predicate).
    #[error("operation failed: {0:?}")]
    Operation(E),

    /// A wait between attempts was cancelled.
    #[error("retry cancelled: {0:?}")]
    Cancelled(R),

    /// The strategy produced a delay the wait primitive cannot arm.
    #[error(transparent)]
    Delay(DelayOutOfRange),
}

impl<E, R> RetryError<E, R> {
    /// Returns the operation error, if that is what ended the sequence.
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            Self::Operation(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the cancellation reason, if the sequence was cancelled.
    pub fn into_cancel_reason(self) -> Option<R> {
        match self {
            Self::Cancelled(reason) => Some(reason),
            _ => None,
        }
    }

    /// Whether the sequence ended because of cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    pub(crate) fn from_wait(err: WaitError<R>) -> Self {
        match err {
            WaitError::Cancelled(reason) => Self::Cancelled(reason),
            WaitError::OutOfRange(err) => Self::Delay(err),
        }
    }
}

/// Errors from the declarative configuration layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration could not be parsed.
    #[error("failed to parse backoff config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration parsed but describes an invalid strategy.
    #[error(transparent)]
    Backoff(#[from] BackoffError),
}
