//! Backoff strategies.
//!
//! Every strategy implements [`BackoffStrategy`]: `next_backoff` yields the
//! wait before the next attempt (or `None` to stop), `reset` returns the
//! strategy to its freshly-constructed state.
//!
//! # Key Types
//!
//! | Strategy | delay for attempt `n` |
//! |---|---|
//! | [`ConstantBackoff`] | `delay` |
//! | [`ZeroBackoff`] | `0` |
//! | [`StopBackoff`] | stop |
//! | [`LinearBackoff`] | `min(cap, initial_delay + increment * n)` |
//! | [`ExponentialBackoff`] | `min(cap, base * 2^n)` |
//! | [`FibonacciBackoff`] | `min(cap, base * fib(n))` |
//! | [`FullJitterBackoff`] | `floor(r * min(cap, base * 2^n))` |
//! | [`EqualJitterBackoff`] | `half + floor(r * half)` |
//! | [`DecorrelatedJitterBackoff`] | `min(cap, floor(base + r * (previous * 3 - base)))` |
//!
//! [`RetryLimit`] bounds any of them to a number of retries.
//!
//! Parameters are milliseconds and are validated when the strategy is built.

mod constant;
mod exponential;
mod fibonacci;
mod jitter;
mod limit;
mod linear;
mod random;
mod strategy;
pub mod validate;

pub use constant::{ConstantBackoff, StopBackoff, ZeroBackoff};
pub use exponential::{ExponentialBackoff, ExponentialBackoffBuilder};
pub use fibonacci::{FibonacciBackoff, FibonacciBackoffBuilder};
pub use jitter::{
    DecorrelatedJitterBackoff, DecorrelatedJitterBackoffBuilder, EqualJitterBackoff,
    EqualJitterBackoffBuilder, FullJitterBackoff, FullJitterBackoffBuilder,
};
pub use limit::RetryLimit;
pub use linear::{LinearBackoff, LinearBackoffBuilder};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use strategy::{BackoffStrategy, BackoffStrategyExt};
