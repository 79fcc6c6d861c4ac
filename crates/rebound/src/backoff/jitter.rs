//! Randomized ("jittered") exponential backoff.
//!
//! Jitter spreads out retries from independent clients that failed at the same
//! moment, so they do not all come back at once. Three variants are provided:
//!
//! | Strategy | delay |
//! |---|---|
//! | [`FullJitterBackoff`] | `floor(r * min(cap, base * 2^n))` |
//! | [`EqualJitterBackoff`] | `half + floor(r * half)`, `half = min(cap, base * 2^n) / 2` |
//! | [`DecorrelatedJitterBackoff`] | `min(cap, floor(base + r * (previous * 3 - base)))` |
//!
//! `r` is drawn from a [`RandomSource`] in `[0, 1)`. `base` and `cap` must be
//! safe integers (milliseconds).

use super::exponential::capped_exponential;
use super::random::{RandomSource, ThreadRandom};
use super::strategy::BackoffStrategy;
use super::validate;
use crate::delay::duration_from_millis;
use crate::error::Result;
use std::time::Duration;

/// Validated `(base, cap)` shared by the jitter builders.
fn base_and_cap(base: Option<f64>, cap: Option<f64>) -> Result<(f64, f64)> {
    let base = validate::safe_integer("base", validate::required("base", base)?)?;
    let cap = match cap {
        Some(cap) => validate::safe_integer("cap", cap)?,
        None => f64::INFINITY,
    };
    validate::cap_at_least(cap, "base", base)?;
    Ok((base, cap))
}

/// `r * span`, where a zero draw contributes nothing even once `span` is infinite.
fn draw(r: f64, span: f64) -> f64 {
    if r == 0.0 { 0.0 } else { r * span }
}

macro_rules! jitter_builder {
    ($(#[$meta:meta])* $builder:ident => $strategy:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $builder<R = ThreadRandom> {
            base: Option<f64>,
            cap: Option<f64>,
            random: R,
        }

        impl Default for $builder {
            fn default() -> Self {
                Self {
                    base: None,
                    cap: None,
                    random: ThreadRandom,
                }
            }
        }

        impl<R: RandomSource> $builder<R> {
            /// Base delay in milliseconds. Required; must be a safe integer.
            pub fn base(mut self, base: f64) -> Self {
                self.base = Some(base);
                self
            }

            /// Upper bound in milliseconds. Default: unbounded; must be a safe integer.
            pub fn cap(mut self, cap: f64) -> Self {
                self.cap = Some(cap);
                self
            }

            /// Replace the source of randomness.
            pub fn random<Q: RandomSource>(self, random: Q) -> $builder<Q> {
                $builder {
                    base: self.base,
                    cap: self.cap,
                    random,
                }
            }
        }

        impl $strategy {
            /// Create a new builder using the thread-local generator.
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}

/// Uniformly random delay in `[0, min(cap, base * 2^n))`.
///
/// # Examples
///
/// ```rust
/// use rebound::backoff::{BackoffStrategy, FullJitterBackoff};
/// use std::time::Duration;
///
/// let mut backoff = FullJitterBackoff::builder()
///     .base(100.0)
///     .cap(1_000.0)
///     .build()
///     .unwrap();
///
/// let delay = backoff.next_backoff().unwrap();
/// assert!(delay < Duration::from_millis(100));
/// ```
#[derive(Debug, Clone)]
pub struct FullJitterBackoff<R = ThreadRandom> {
    base: f64,
    cap: f64,
    attempt: u32,
    random: R,
}

jitter_builder!(
    /// Builder for [`FullJitterBackoff`].
    FullJitterBackoffBuilder => FullJitterBackoff
);

impl<R: RandomSource> FullJitterBackoffBuilder<R> {
    /// Validate the parameters and build the strategy.
    pub fn build(self) -> Result<FullJitterBackoff<R>> {
        let (base, cap) = base_and_cap(self.base, self.cap)?;
        Ok(FullJitterBackoff {
            base,
            cap,
            attempt: 0,
            random: self.random,
        })
    }
}

impl<R: RandomSource> BackoffStrategy for FullJitterBackoff<R> {
    fn next_backoff(&mut self) -> Option<Duration> {
        let ceiling = capped_exponential(self.base, self.cap, self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        Some(duration_from_millis(
            draw(self.random.next_f64(), ceiling).floor(),
        ))
    }

    fn reset(&mut self) {
        self.attempt = 0;
    }
}

/// Half of the exponential delay is kept, the other half is randomized.
#[derive(Debug, Clone)]
pub struct EqualJitterBackoff<R = ThreadRandom> {
    base: f64,
    cap: f64,
    attempt: u32,
    random: R,
}

jitter_builder!(
    /// Builder for [`EqualJitterBackoff`].
    EqualJitterBackoffBuilder => EqualJitterBackoff
);

impl<R: RandomSource> EqualJitterBackoffBuilder<R> {
    /// Validate the parameters and build the strategy.
    pub fn build(self) -> Result<EqualJitterBackoff<R>> {
        let (base, cap) = base_and_cap(self.base, self.cap)?;
        Ok(EqualJitterBackoff {
            base,
            cap,
            attempt: 0,
            random: self.random,
        })
    }
}

impl<R: RandomSource> BackoffStrategy for EqualJitterBackoff<R> {
    fn next_backoff(&mut self) -> Option<Duration> {
        let half = capped_exponential(self.base, self.cap, self.attempt) / 2.0;
        self.attempt = self.attempt.saturating_add(1);
        Some(duration_from_millis(
            half + draw(self.random.next_f64(), half).floor(),
        ))
    }

    fn reset(&mut self) {
        self.attempt = 0;
    }
}

/// Each delay is drawn relative to the previous one rather than the attempt
/// count, which decorrelates clients that started together.
///
/// The previous delay starts at `base`; [`reset`](BackoffStrategy::reset)
/// restores it.
#[derive(Debug, Clone)]
pub struct DecorrelatedJitterBackoff<R = ThreadRandom> {
    base: f64,
    cap: f64,
    previous: f64,
    random: R,
}

jitter_builder!(
    /// Builder for [`DecorrelatedJitterBackoff`].
    DecorrelatedJitterBackoffBuilder => DecorrelatedJitterBackoff
);

impl<R: RandomSource> DecorrelatedJitterBackoffBuilder<R> {
    /// Validate the parameters and build the strategy.
    pub fn build(self) -> Result<DecorrelatedJitterBackoff<R>> {
        let (base, cap) = base_and_cap(self.base, self.cap)?;
        Ok(DecorrelatedJitterBackoff {
            base,
            cap,
            previous: base,
            random: self.random,
        })
    }
}

impl<R: RandomSource> BackoffStrategy for DecorrelatedJitterBackoff<R> {
    fn next_backoff(&mut self) -> Option<Duration> {
        let spread = self.previous * 3.0 - self.base;
        let delay = (self.base + draw(self.random.next_f64(), spread))
            .floor()
            .min(self.cap);
        self.previous = delay;
        Some(duration_from_millis(delay))
    }

    fn reset(&mut self) {
        self.previous = self.base;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backoff::random::SeededRandom;
    use crate::error::BackoffError;

    /// A source that replays `values` in order, then repeats the last one.
    fn sequence(values: &'static [f64]) -> impl FnMut() -> f64 + Send {
        let mut index = 0;
        move || {
            let value = values[index.min(values.len() - 1)];
            index += 1;
            value
        }
    }

    fn ms(value: u64) -> Option<Duration> {
        Some(Duration::from_millis(value))
    }

    #[test]
    fn test_full_jitter_scales_exponential_ceiling() {
        let mut backoff = FullJitterBackoff::builder()
            .base(100.0)
            .cap(1_000.0)
            .random(sequence(&[0.5, 0.5, 0.5, 0.999, 0.0]))
            .build()
            .unwrap();

        assert_eq!(backoff.next_backoff(), ms(50));
        assert_eq!(backoff.next_backoff(), ms(100));
        assert_eq!(backoff.next_backoff(), ms(200));
        // ceiling 800ms, floor(0.999 * 800) = 799
        assert_eq!(backoff.next_backoff(), ms(799));
        assert_eq!(backoff.next_backoff(), ms(0));
    }

    #[test]
    fn test_full_jitter_never_reaches_ceiling() {
        let mut backoff = FullJitterBackoff::builder()
            .base(10.0)
            .cap(640.0)
            .random(SeededRandom::new(7))
            .build()
            .unwrap();

        for attempt in 0..64u32 {
            let ceiling = (10u64 << attempt.min(6)).min(640);
            let delay = backoff.next_backoff().unwrap();
            assert!(delay < Duration::from_millis(ceiling), "{delay:?} >= {ceiling}ms");
        }
    }

    #[test]
    fn test_equal_jitter_keeps_half() {
        let mut backoff = EqualJitterBackoff::builder()
            .base(100.0)
            .cap(400.0)
            .random(sequence(&[0.0, 0.5, 0.999, 0.999]))
            .build()
            .unwrap();

        // half = 50
        assert_eq!(backoff.next_backoff(), ms(50));
        // half = 100, 100 + floor(0.5 * 100)
        assert_eq!(backoff.next_backoff(), ms(150));
        // half = 200, 200 + floor(0.999 * 200)
        assert_eq!(backoff.next_backoff(), ms(399));
        // capped at 400, same as above
        assert_eq!(backoff.next_backoff(), ms(399));
    }

    #[test]
    fn test_decorrelated_jitter_tracks_previous_delay() {
        let mut backoff = DecorrelatedJitterBackoff::builder()
            .base(100.0)
            .cap(1_000.0)
            .random(sequence(&[0.5, 0.5, 0.999]))
            .build()
            .unwrap();

        // 100 + 0.5 * (300 - 100)
        assert_eq!(backoff.next_backoff(), ms(200));
        // 100 + 0.5 * (600 - 100)
        assert_eq!(backoff.next_backoff(), ms(350));
        // 100 + floor(0.999 * (1050 - 100)) = 1049, capped
        assert_eq!(backoff.next_backoff(), ms(1_000));
    }

    #[test]
    fn test_decorrelated_reset_reseeds_previous() {
        let mut backoff = DecorrelatedJitterBackoff::builder()
            .base(100.0)
            .random(|| 0.5)
            .build()
            .unwrap();

        let first = backoff.next_backoff();
        backoff.next_backoff();
        backoff.next_backoff();
        backoff.reset();
        assert_eq!(backoff.next_backoff(), first);
    }

    #[test]
    fn test_jitter_requires_safe_integers() {
        assert!(matches!(
            FullJitterBackoff::builder().base(10.5).build(),
            Err(BackoffError::InvalidParameter { name: "base", .. })
        ));
        assert!(matches!(
            EqualJitterBackoff::builder().base(10.0).cap(1e300).build(),
            Err(BackoffError::InvalidParameter { name: "cap", .. })
        ));
        assert!(matches!(
            DecorrelatedJitterBackoff::builder().base(100.0).cap(50.0).build(),
            Err(BackoffError::CapBelowBase { .. })
        ));
        assert!(matches!(
            DecorrelatedJitterBackoff::builder().build(),
            Err(BackoffError::Missing("base"))
        ));
    }

    #[test]
    fn test_default_source_stays_in_range() {
        let mut backoff = EqualJitterBackoff::builder()
            .base(100.0)
            .cap(100.0)
            .build()
            .unwrap();
        for _ in 0..100 {
            let delay = backoff.next_backoff().unwrap();
            assert!(delay >= Duration::from_millis(50) && delay < Duration::from_millis(100));
        }
    }

    #[test]
    fn test_full_jitter_zero_base_stays_zero_past_overflow() {
        let mut uncapped = FullJitterBackoff::builder()
            .base(0.0)
            .random(|| 0.999)
            .build()
            .unwrap();
        let mut capped = FullJitterBackoff::builder()
            .base(0.0)
            .cap(1_000.0)
            .random(|| 0.999)
            .build()
            .unwrap();

        for attempt in 0..1_100 {
            assert_eq!(uncapped.next_backoff(), Some(Duration::ZERO), "attempt {attempt}");
            assert_eq!(capped.next_backoff(), Some(Duration::ZERO), "attempt {attempt}");
        }
    }

    #[test]
    fn test_equal_jitter_zero_draw_on_infinite_ceiling() {
        let mut backoff = EqualJitterBackoff::builder()
            .base(1.0)
            .random(|| 0.0)
            .build()
            .unwrap();

        let last = (0..1_100).filter_map(|_| backoff.next_backoff()).last();
        assert_eq!(last, Some(Duration::MAX));
    }

    #[test]
    fn test_decorrelated_zero_draw_after_unbounded_growth() {
        let mut calls = 0;
        let mut backoff = DecorrelatedJitterBackoff::builder()
            .base(100.0)
            .random(move || {
                calls += 1;
                if calls <= 1_000 { 0.99 } else { 0.0 }
            })
            .build()
            .unwrap();

        for _ in 0..1_000 {
            backoff.next_backoff();
        }
        // previous delay is infinite by now; a zero draw lands on base
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(100)));
    }
}
