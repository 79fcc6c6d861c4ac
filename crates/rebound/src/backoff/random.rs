//! Uniform `[0, 1)` sources for the jitter strategies.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniformly distributed values in `[0, 1)`.
///
/// Jitter strategies draw from this instead of a global generator so tests can
/// substitute a fixed sequence. Any `FnMut() -> f64 + Send` closure works.
///
/// # Examples
///
/// ```rust
/// use rebound::backoff::{BackoffStrategy, FullJitterBackoff};
/// use std::time::Duration;
///
/// let mut backoff = FullJitterBackoff::builder()
///     .base(100.0)
///     .random(|| 0.5)
///     .build()
///     .unwrap();
///
/// assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(50)));
/// ```
pub trait RandomSource: Send {
    /// Next value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

impl<F> RandomSource for F
where
    F: FnMut() -> f64 + Send,
{
    fn next_f64(&mut self) -> f64 {
        self()
    }
}

/// The thread-local generator from `rand`. Default for every jitter strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&mut self) -> f64 {
        rand::random::<f64>()
    }
}

/// A seeded generator for reproducible jitter.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Create a generator from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_random_in_unit_interval() {
        let mut source = ThreadRandom;
        for _ in 0..1000 {
            let value = source.next_f64();
            assert!((0.0..1.0).contains(&value), "{value}");
        }
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn test_closure_source() {
        let mut values = [0.25, 0.75].into_iter().cycle();
        let mut source = move || values.next().unwrap_or(0.0);
        assert_eq!(source.next_f64(), 0.25);
        assert_eq!(source.next_f64(), 0.75);
        assert_eq!(source.next_f64(), 0.25);
    }
}
