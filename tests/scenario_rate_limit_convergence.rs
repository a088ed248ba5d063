//! End-to-end: ten straight successes converge the per-domain delay toward
//! the floor, a single blocked failure doubles it, and `wait()` itself (not
//! just the bookkeeping calls) actually sleeps for the computed delay
//! (spec.md §8 scenario 4).

use scrape_ratelimiter::{RateLimiter, RateLimiterConfig};
use std::time::{Duration, Instant};

fn limiter(max_delay: Duration) -> RateLimiter {
    RateLimiter::new(RateLimiterConfig {
        min_delay: Duration::from_millis(1),
        max_delay,
        ..RateLimiterConfig::default()
    })
}

#[tokio::test]
async fn successes_converge_then_a_block_doubles_and_wait_sleeps_for_it() {
    let limiter = limiter(Duration::from_secs(2));

    for _ in 0..10 {
        limiter.record_success("glassdoor.com", None).await;
    }
    let converged = limiter.current_delay("glassdoor.com").await;
    let expected = 1000.0 * 0.9f64.powi(10);
    assert!((converged.as_secs_f64() * 1000.0 - expected).abs() < 0.5);

    limiter.record_failure("glassdoor.com", true).await;
    let after_block = limiter.current_delay("glassdoor.com").await;
    assert!((after_block.as_secs_f64() - converged.as_secs_f64() * 2.0).abs() < 0.001);

    // The block-decay multiplier (step 4) inflates this call further on top
    // of the already-doubled base since the block just happened.
    let started = Instant::now();
    limiter.wait("glassdoor.com", 5).await;
    assert!(started.elapsed() >= after_block, "wait() must sleep at least the post-block delay");
}

#[tokio::test]
async fn a_more_urgent_priority_never_waits_longer_than_a_relaxed_one() {
    let limiter = limiter(Duration::from_millis(500));

    let urgent_start = Instant::now();
    limiter.wait("urgent.example", 1).await;
    let urgent_elapsed = urgent_start.elapsed();

    let relaxed_start = Instant::now();
    limiter.wait("relaxed.example", 10).await;
    let relaxed_elapsed = relaxed_start.elapsed();

    assert!(urgent_elapsed <= relaxed_elapsed + Duration::from_millis(5));
}
