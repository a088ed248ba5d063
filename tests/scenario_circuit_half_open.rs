//! End-to-end: a circuit that trips OPEN lets exactly one probe through
//! after its recovery timeout, and that probe's outcome decides whether it
//! closes or reopens (spec.md §8 scenario 3), exercised through the
//! registry's public admission contract rather than the inner state
//! machine directly.

use scrape_circuitbreaker::{CircuitBreakerConfig, Registry};
use std::time::Duration;

fn config() -> CircuitBreakerConfig {
    CircuitBreakerConfig {
        failure_threshold: 3,
        recovery_timeout: Duration::from_millis(40),
        success_threshold: 2,
    }
}

#[tokio::test]
async fn half_open_probe_closes_the_circuit_on_enough_successes() {
    let registry = Registry::new(config());

    for _ in 0..3 {
        registry.on_failure("indeed.com").await;
    }
    assert!(registry.before_call("indeed.com").await.is_err(), "open circuit refuses admission");

    tokio::time::sleep(Duration::from_millis(60)).await;

    // First probe admitted (HALF_OPEN), then enough successes to close.
    registry.before_call("indeed.com").await.expect("recovery timeout elapsed, probe admitted");
    registry.on_success("indeed.com").await;
    registry.on_success("indeed.com").await;

    assert!(registry.before_call("indeed.com").await.is_ok());
    assert!(!registry.open_domains().await.contains(&"indeed.com".to_string()));
}

#[tokio::test]
async fn a_single_half_open_failure_reopens_the_circuit() {
    let registry = Registry::new(config());

    for _ in 0..3 {
        registry.on_failure("linkedin.com").await;
    }
    assert!(registry.before_call("linkedin.com").await.is_err());

    tokio::time::sleep(Duration::from_millis(60)).await;

    registry.before_call("linkedin.com").await.expect("probe admitted");
    registry.on_failure("linkedin.com").await;

    assert!(registry.before_call("linkedin.com").await.is_err(), "one half-open failure reopens immediately");
    assert!(registry.open_domains().await.contains(&"linkedin.com".to_string()));
}
