#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Retry loops with composable backoff strategies.
//!
//! This crate provides:
//!
//! - **A backoff abstraction** via the [`BackoffStrategy`](backoff::BackoffStrategy) trait
//!   - Constant, zero, stop, linear, exponential, and Fibonacci delays
//!   - Full, equal, and decorrelated jitter
//!   - A [`RetryLimit`](backoff::RetryLimit) decorator that bounds any strategy
//! - **A retry loop** via [`Retry`] and [`retry`], with stop predicates
//! - **Cooperative cancellation** via [`CancellationHandle`](cancel::CancellationHandle),
//!   honored by the cancellable [`wait`](delay::wait) primitive
//! - **Declarative configuration** via [`RetryConfig`](config::RetryConfig)
//!
//! # Design Philosophy
//!
//! - Strategies only compute delays; the loop owns control flow
//! - `None` from a strategy means "stop", never a magic number
//! - Parameters are validated when a strategy is built, never on first use
//! - Cancellation is passed explicitly to every layer that can wait
//!
//! # Examples
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use rebound::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut backoff = ExponentialBackoff::builder()
//!     .base(100.0)
//!     .cap(5_000.0)
//!     .build()?
//!     .with_retry_limit(3);
//!
//! let token = CancelToken::<&str>::new();
//!
//! let result = Retry::new(&mut backoff)
//!     .cancel_on(&token)
//!     .run(|| async { Ok::<_, std::io::Error>(42) })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod backoff;
pub mod cancel;
pub mod config;
pub mod delay;
pub mod error;
pub mod retry;


pub use retry::{NeverStop, Retry, StopPredicate, retry};

/// Convenient re-exports of commonly used items.
///
/// Import all core abstractions with:
///
/// ```rust
/// use rebound::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backoff::{
        BackoffStrategy, BackoffStrategyExt, ConstantBackoff, DecorrelatedJitterBackoff,
        EqualJitterBackoff, ExponentialBackoff, FibonacciBackoff, FullJitterBackoff,
        LinearBackoff, RetryLimit, StopBackoff, ZeroBackoff,
    };
    pub use crate::cancel::{CancelToken, CancellationHandle, NoCancel};
    pub use crate::config::{BackoffConfig, RetryConfig};
    pub use crate::delay::{MAX_DELAY, wait};
    pub use crate::error::{BackoffError, RetryError, WaitError};
    pub use crate::retry::{Retry, retry};
}
