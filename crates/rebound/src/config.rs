//! Declarative strategy configuration.
//!
//! [`BackoffConfig`] describes any built-in strategy as plain data so it can
//! live next to the rest of an application's settings. Building goes through
//! the same validating builders as the typed API, so an invalid configuration
//! fails when it is built, not when the first delay is computed.
//!
//! # Examples
//!
//! ```rust
//! use rebound::config::RetryConfig;
//! use std::time::Duration;
//!
//! let config: RetryConfig = r#"{
//!     "backoff": { "kind": "exponential", "base": 100, "cap": 500 },
//!     "max_retries": 2
//! }"#
//! .parse()
//! .unwrap();
//!
//! let mut backoff = config.build().unwrap();
//! assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(100)));
//! assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(200)));
//! assert_eq!(backoff.next_backoff(), None);
//! ```

use crate::backoff::{
    BackoffStrategy, BackoffStrategyExt, ConstantBackoff, DecorrelatedJitterBackoff,
    EqualJitterBackoff, ExponentialBackoff, FibonacciBackoff, FullJitterBackoff, LinearBackoff,
    StopBackoff, ZeroBackoff,
};
use crate::error::{BackoffError, ConfigError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the built-in strategies and its parameters (milliseconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackoffConfig {
    /// [`ConstantBackoff`]
    Constant {
        /// Fixed delay
        delay: f64,
    },
    /// [`ZeroBackoff`]
    Zero,
    /// [`StopBackoff`]
    Stop,
    /// [`LinearBackoff`]
    Linear {
        /// Delay for the first retry
        #[serde(default)]
        initial_delay: f64,
        /// Growth per retry
        increment: f64,
        /// Upper bound, unbounded when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cap: Option<f64>,
    },
    /// [`ExponentialBackoff`]
    Exponential {
        /// Delay for the first retry
        base: f64,
        /// Upper bound, unbounded when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cap: Option<f64>,
    },
    /// [`FibonacciBackoff`]
    Fibonacci {
        /// Unit of the sequence
        base: f64,
        /// Upper bound, unbounded when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cap: Option<f64>,
    },
    /// [`FullJitterBackoff`]
    FullJitter {
        /// Base of the exponential ceiling
        base: f64,
        /// Upper bound, unbounded when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cap: Option<f64>,
    },
    /// [`EqualJitterBackoff`]
    EqualJitter {
        /// Base of the exponential ceiling
        base: f64,
        /// Upper bound, unbounded when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cap: Option<f64>,
    },
    /// [`DecorrelatedJitterBackoff`]
    DecorrelatedJitter {
        /// Lower bound and seed of the previous delay
        base: f64,
        /// Upper bound, unbounded when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cap: Option<f64>,
    },
}

impl BackoffConfig {
    /// Validate and build the described strategy.
    pub fn build(&self) -> Result<Box<dyn BackoffStrategy>, BackoffError> {
        let strategy = match *self {
            Self::Constant { delay } => ConstantBackoff::new(delay)?.boxed(),
            Self::Zero => ZeroBackoff.boxed(),
            Self::Stop => StopBackoff.boxed(),
            Self::Linear {
                initial_delay,
                increment,
                cap,
            } => {
                let mut builder = LinearBackoff::builder()
                    .initial_delay(initial_delay)
                    .increment(increment);
                if let Some(cap) = cap {
                    builder = builder.cap(cap);
                }
                builder.build()?.boxed()
            }
            Self::Exponential { base, cap } => {
                let mut builder = ExponentialBackoff::builder().base(base);
                if let Some(cap) = cap {
                    builder = builder.cap(cap);
                }
                builder.build()?.boxed()
            }
            Self::Fibonacci { base, cap } => {
                let mut builder = FibonacciBackoff::builder().base(base);
                if let Some(cap) = cap {
                    builder = builder.cap(cap);
                }
                builder.build()?.boxed()
            }
            Self::FullJitter { base, cap } => {
                let mut builder = FullJitterBackoff::builder().base(base);
                if let Some(cap) = cap {
                    builder = builder.cap(cap);
                }
                builder.build()?.boxed()
            }
            Self::EqualJitter { base, cap } => {
                let mut builder = EqualJitterBackoff::builder().base(base);
                if let Some(cap) = cap {
                    builder = builder.cap(cap);
                }
                builder.build()?.boxed()
            }
            Self::DecorrelatedJitter { base, cap } => {
                let mut builder = DecorrelatedJitterBackoff::builder().base(base);
                if let Some(cap) = cap {
                    builder = builder.cap(cap);
                }
                builder.build()?.boxed()
            }
        };
        Ok(strategy)
    }
}

impl FromStr for BackoffConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

/// A strategy plus an optional retry budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// The delay policy
    pub backoff: BackoffConfig,
    /// Wrap the strategy in a [`RetryLimit`](crate::backoff::RetryLimit) when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

impl RetryConfig {
    /// Validate and build the strategy, applying `max_retries` if present.
    pub fn build(&self) -> Result<Box<dyn BackoffStrategy>, BackoffError> {
        let strategy = self.backoff.build()?;
        Ok(match self.max_retries {
            Some(retries) => strategy.with_retry_limit(retries).boxed(),
            None => strategy,
        })
    }
}

impl FromStr for RetryConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}
