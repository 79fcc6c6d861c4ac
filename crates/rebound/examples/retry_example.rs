//! Example: retrying a flaky operation with rebound
//!
//! This example demonstrates:
//! 1. Simple retry with exponential backoff and a retry limit
//! 2. A stop predicate that gives up on permanent errors
//! 3. Cancelling a retry sequence from another task
//! 4. Jitter impact (run multiple times to see variance)
//!
//! Run with:
//! ```bash
//! RUST_LOG=rebound=debug cargo run -p rebound --example retry_example
//! ```

use rebound::prelude::*;
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// A simulated API that fails the first few times
struct UnreliableApi {
    attempts: Arc<AtomicU32>,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Self {
        Self {
            attempts: Arc::new(AtomicU32::new(0)),
            fail_count,
        }
    }

    async fn call(&self) -> Result<String, std::io::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if attempt < self.fail_count {
            println!(
                "  Attempt {}: FAILED (simulating transient error)",
                attempt + 1
            );
            Err(std::io::Error::other(format!(
                "Transient error on attempt {}",
                attempt + 1
            )))
        } else {
            println!("  Attempt {}: SUCCESS", attempt + 1);
            Ok("API response data".to_string())
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Example 1: Simple retry with exponential backoff
async fn example_simple_retry() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 1: Exponential Backoff with a Retry Limit ===\n");

    let mut backoff = ExponentialBackoff::builder()
        .base(100.0)
        .cap(1_000.0)
        .build()?
        .with_retry_limit(3);

    let api = UnreliableApi::new(2); // Fail first 2 attempts

    println!("Calling unreliable API (will fail 2 times before succeeding)...");
    let start = Instant::now();

    let result = retry(&mut backoff, || api.call()).await?;

    println!("\nResult: {}", result);
    println!("Total attempts: {}", api.total_attempts());
    println!("Total time: {:?}", start.elapsed());
    println!("Expected delays: 100ms + 200ms = ~300ms");

    Ok(())
}

/// Example 2: Stop predicate (give up on permission errors)
async fn example_stop_predicate() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 2: Stop Predicate (Permanent Errors) ===\n");

    let mut backoff = ConstantBackoff::new(10.0)?;

    let result = Retry::new(&mut backoff)
        .stop_if(|err: &std::io::Error, attempt| {
            println!("  Attempt {} failed: {}", attempt + 1, err);
            err.kind() == std::io::ErrorKind::PermissionDenied
        })
        .run(|| async {
            Err::<(), _>(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "auth failed",
            ))
        })
        .await;

    match result {
        Err(RetryError::Operation(err)) => println!("Gave up immediately: {}", err),
        other => println!("Unexpected outcome: {:?}", other),
    }

    Ok(())
}

/// Example 3: Cancellation from another task
async fn example_cancellation() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 3: Cancelling a Retry Sequence ===\n");

    let token = CancelToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(250)).await;
        trigger.cancel("user pressed ctrl-c");
    });

    let mut backoff = ConstantBackoff::new(100.0)?;
    let api = UnreliableApi::new(u32::MAX);

    let result = Retry::new(&mut backoff)
        .cancel_on(&token)
        .run(|| api.call())
        .await;

    match result {
        Err(RetryError::Cancelled(reason)) => println!("\nCancelled: {}", reason),
        other => println!("Unexpected outcome: {:?}", other),
    }
    println!("Total attempts: {}", api.total_attempts());

    Ok(())
}

/// Example 4: Jitter demonstration
fn example_jitter_impact() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 4: Jitter Impact (First 5 Delays) ===\n");

    let mut plain = ExponentialBackoff::builder().base(100.0).build()?;
    let mut full = FullJitterBackoff::builder().base(100.0).build()?;
    let mut equal = EqualJitterBackoff::builder().base(100.0).build()?;
    let mut decorrelated = DecorrelatedJitterBackoff::builder()
        .base(100.0)
        .cap(5_000.0)
        .build()?;

    println!("  {:>12} {:>12} {:>12} {:>12}", "exponential", "full", "equal", "decorrelated");
    for _ in 0..5 {
        println!(
            "  {:>12?} {:>12?} {:>12?} {:>12?}",
            plain.next_backoff().unwrap_or_default(),
            full.next_backoff().unwrap_or_default(),
            equal.next_backoff().unwrap_or_default(),
            decorrelated.next_backoff().unwrap_or_default(),
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("==============================================");
    println!("   rebound: Retry Strategy Examples");
    println!("==============================================");

    example_simple_retry().await?;
    example_stop_predicate().await?;
    example_cancellation().await?;
    example_jitter_impact()?;

    println!("\n==============================================");
    println!("   All examples completed successfully!");
    println!("==============================================\n");

    Ok(())
}
