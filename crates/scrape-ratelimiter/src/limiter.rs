//! [`RateLimiter`] and the per-domain [`DomainStats`] it tracks (C2,
//! spec.md §4.2). The delay calculation is `original_source/.../
//! rate_limiter.py`'s `_calculate_delay` verbatim — eight numbered steps,
//! ported 1:1 rather than reinvented as a windowed algorithm.

use crate::config::RateLimiterConfig;
use crate::events::RateLimiterEvent;
use scrape_core::events::EventListeners;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

const STATS_HISTORY: usize = 100;

/// Per-domain statistics backing the adaptive delay calculation
/// (spec.md §3). Bounded FIFOs cap memory per domain at `STATS_HISTORY`
/// entries regardless of how long the process has been scraping it.
#[derive(Debug, Clone)]
pub struct DomainStats {
    request_times: VecDeque<Instant>,
    response_times: VecDeque<Duration>,
    success_count: u64,
    failure_count: u64,
    block_count: u64,
    current_delay: Duration,
    last_request_at: Option<Instant>,
    last_block_at: Option<Instant>,
}

impl Default for DomainStats {
    fn default() -> Self {
        Self {
            request_times: VecDeque::with_capacity(STATS_HISTORY),
            response_times: VecDeque::with_capacity(STATS_HISTORY),
            success_count: 0,
            failure_count: 0,
            block_count: 0,
            current_delay: Duration::from_millis(1000),
            last_request_at: None,
            last_block_at: None,
        }
    }
}

impl DomainStats {
    pub fn current_delay(&self) -> Duration {
        self.current_delay
    }

    pub fn success_count(&self) -> u64 {
        self.success_count
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count
    }

    pub fn block_count(&self) -> u64 {
        self.block_count
    }

    fn total_requests(&self) -> u64 {
        self.success_count + self.failure_count
    }

    fn success_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            1.0
        } else {
            self.success_count as f64 / total as f64
        }
    }

    fn avg_response_ms(&self) -> Option<f64> {
        if self.response_times.is_empty() {
            return None;
        }
        let sum: Duration = self.response_times.iter().sum();
        Some(sum.as_secs_f64() * 1000.0 / self.response_times.len() as f64)
    }

    fn push_bounded<T>(deque: &mut VecDeque<T>, value: T) {
        if deque.len() >= STATS_HISTORY {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}

/// C2: per-domain adaptive delay calculation and success/failure feedback.
pub struct RateLimiter {
    config: RateLimiterConfig,
    domains: Mutex<HashMap<String, DomainStats>>,
    events: EventListeners<RateLimiterEvent>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            domains: Mutex::new(HashMap::new()),
            events: EventListeners::new(),
        }
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: scrape_core::events::EventListener<RateLimiterEvent> + 'static,
    {
        self.events.add(listener);
    }

    /// `await(domain, priority)`: computes the delay per the eight steps in
    /// spec.md §4.2 and sleeps for the remainder of it. FIFO per domain
    /// because the per-domain lock serializes callers; cancellation of the
    /// returned future (by a `tokio::select!` at the call site) aborts the
    /// sleep promptly without having consumed a "token".
    pub async fn wait(&self, domain: &str, priority: u8) {
        let delay = {
            let mut domains = self.domains.lock().await;
            let stats = domains.entry(domain.to_string()).or_default();
            self.compute_delay(stats, priority)
        };

        self.events.emit(&RateLimiterEvent::DelayComputed {
            domain: domain.to_string(),
            delay,
        });

        let now = Instant::now();
        let wait_for = {
            let mut domains = self.domains.lock().await;
            let stats = domains.entry(domain.to_string()).or_default();
            let since_last = stats
                .last_request_at
                .map(|t| now.duration_since(t))
                .unwrap_or(delay);
            let remaining = delay.saturating_sub(since_last);

            DomainStats::push_bounded(&mut stats.request_times, now);
            stats.last_request_at = Some(now);
            remaining
        };

        if !wait_for.is_zero() {
            #[cfg(feature = "tracing")]
            tracing::debug!(domain, wait_ms = wait_for.as_millis() as u64, "rate limiting");
            sleep(wait_for).await;
        }
    }

    /// Steps 1-7 of spec.md §4.2's `_calculate_delay`.
    fn compute_delay(&self, stats: &mut DomainStats, priority: u8) -> Duration {
        if !self.config.adaptive {
            return self.config.initial_delay;
        }

        let mut delay = stats.current_delay.as_secs_f64();

        // Step 2: success-rate adjustment, needs >10 samples like the source.
        if stats.total_requests() > 10 {
            let success_rate = stats.success_rate();
            if success_rate < self.config.target_success_rate {
                let diff = self.config.target_success_rate - success_rate;
                delay *= 1.0 + diff;
            }

            // Step 3: slow-response adjustment.
            if let Some(avg_ms) = stats.avg_response_ms() {
                if avg_ms > 2000.0 {
                    delay *= avg_ms / 2000.0;
                }
            }
        }

        // Step 4: block-decay.
        if let Some(last_block) = stats.last_block_at {
            let since = last_block.elapsed().as_secs_f64();
            if since < 300.0 {
                let block_factor = (-since / 300.0).exp() * 2.0;
                delay *= 1.0 + block_factor;
            }
        }

        // Step 5: window limit.
        let now = Instant::now();
        let window = self.config.window;
        while let Some(&oldest) = stats.request_times.front() {
            if now.duration_since(oldest) >= window {
                stats.request_times.pop_front();
            } else {
                break;
            }
        }
        if stats.request_times.len() >= self.config.window_limit {
            if let Some(&oldest) = stats.request_times.front() {
                let until_free = window.saturating_sub(now.duration_since(oldest));
                delay = delay.max(until_free.as_secs_f64() + 0.1);
            }
        }

        // Step 6: priority scaling — lower number (more urgent) reduces
        // wait; this is the literal `priority / 5.0` formula, verified
        // against the source as *not* inverted (spec.md §9/SPEC_FULL §4.2).
        delay *= priority as f64 / 5.0;

        // Step 7: clamp.
        let clamped = delay
            .max(self.config.min_delay.as_secs_f64())
            .min(self.config.max_delay.as_secs_f64());

        Duration::from_secs_f64(clamped)
    }

    /// `recordSuccess(domain, rttMs)`.
    pub async fn record_success(&self, domain: &str, rtt: Option<Duration>) {
        let new_delay = {
            let mut domains = self.domains.lock().await;
            let stats = domains.entry(domain.to_string()).or_default();
            stats.success_count += 1;
            if let Some(rtt) = rtt {
                DomainStats::push_bounded(&mut stats.response_times, rtt);
            }
            if self.config.adaptive {
                let reduced = stats.current_delay.as_secs_f64() * 0.9;
                stats.current_delay =
                    Duration::from_secs_f64(reduced.max(self.config.min_delay.as_secs_f64()));
            }
            stats.current_delay
        };
        self.events.emit(&RateLimiterEvent::SuccessRecorded {
            domain: domain.to_string(),
            new_delay,
        });
    }

    /// `recordFailure(domain, blocked)`.
    pub async fn record_failure(&self, domain: &str, blocked: bool) {
        let new_delay = {
            let mut domains = self.domains.lock().await;
            let stats = domains.entry(domain.to_string()).or_default();
            stats.failure_count += 1;
            if blocked {
                stats.block_count += 1;
                stats.last_block_at = Some(Instant::now());
                if self.config.adaptive {
                    let penalized = stats.current_delay.as_secs_f64() * 2.0;
                    stats.current_delay =
                        Duration::from_secs_f64(penalized.min(self.config.max_delay.as_secs_f64()));
                }
            } else if self.config.adaptive {
                let penalized = stats.current_delay.as_secs_f64() * 1.2;
                stats.current_delay =
                    Duration::from_secs_f64(penalized.min(self.config.max_delay.as_secs_f64()));
            }
            stats.current_delay
        };
        self.events.emit(&RateLimiterEvent::FailureRecorded {
            domain: domain.to_string(),
            blocked,
            new_delay,
        });
    }

    pub async fn current_delay(&self, domain: &str) -> Duration {
        let domains = self.domains.lock().await;
        domains
            .get(domain)
            .map(|s| s.current_delay())
            .unwrap_or(self.config.initial_delay)
    }

    pub async fn reset_domain(&self, domain: &str) {
        let mut domains = self.domains.lock().await;
        domains.insert(domain.to_string(), DomainStats::default());
    }

    /// Multiplies every tracked domain's current delay by `factor`,
    /// clamped to `max_delay` — the health monitor's corrective action for
    /// a sustained rise in block/error rate, applied the same way
    /// `record_failure`'s blocked-penalty multiplies a single domain's
    /// delay rather than recomputing it from scratch.
    pub async fn widen_all(&self, factor: f64) {
        let mut domains = self.domains.lock().await;
        for stats in domains.values_mut() {
            let widened = stats.current_delay.as_secs_f64() * factor;
            stats.current_delay = Duration::from_secs_f64(widened.min(self.config.max_delay.as_secs_f64()));
        }
        let domain_count = domains.len();
        drop(domains);
        self.events.emit(&RateLimiterEvent::DelaysWidened { factor, domain_count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RateLimiterConfig {
        RateLimiterConfig {
            initial_delay: Duration::from_millis(1000),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn ten_successes_converge_per_scenario_four() {
        let limiter = RateLimiter::new(config());
        for _ in 0..10 {
            limiter.record_success("example.com", None).await;
        }
        let delay = limiter.current_delay("example.com").await;
        let expected = 1000.0 * 0.9f64.powi(10);
        assert!(
            (delay.as_secs_f64() * 1000.0 - expected).abs() < 0.5,
            "expected ~{expected}ms, got {:?}",
            delay
        );
    }

    #[tokio::test]
    async fn blocked_failure_doubles_delay_and_stamps_block_time() {
        let limiter = RateLimiter::new(config());
        for _ in 0..10 {
            limiter.record_success("example.com", None).await;
        }
        let before = limiter.current_delay("example.com").await;
        limiter.record_failure("example.com", true).await;
        let after = limiter.current_delay("example.com").await;
        assert!((after.as_secs_f64() - before.as_secs_f64() * 2.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn lower_priority_number_never_waits_longer() {
        let limiter = RateLimiter::new(config());
        let mut urgent_stats = DomainStats::default();
        let mut relaxed_stats = DomainStats::default();
        let urgent = limiter.compute_delay(&mut urgent_stats, 1);
        let relaxed = limiter.compute_delay(&mut relaxed_stats, 10);
        assert!(urgent <= relaxed);
    }

    #[tokio::test]
    async fn unknown_domain_starts_at_initial_delay() {
        let limiter = RateLimiter::new(config());
        assert_eq!(
            limiter.current_delay("fresh.example").await,
            Duration::from_millis(1000)
        );
    }

    #[tokio::test]
    async fn widen_all_scales_every_tracked_domain() {
        let limiter = RateLimiter::new(config());
        limiter.record_success("a.example", None).await;
        limiter.record_success("b.example", None).await;
        let before_a = limiter.current_delay("a.example").await;
        let before_b = limiter.current_delay("b.example").await;

        limiter.widen_all(3.0).await;

        assert!((limiter.current_delay("a.example").await.as_secs_f64() - before_a.as_secs_f64() * 3.0).abs() < 0.001);
        assert!((limiter.current_delay("b.example").await.as_secs_f64() - before_b.as_secs_f64() * 3.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn widen_all_respects_max_delay_clamp() {
        let limiter = RateLimiter::new(config());
        limiter.record_failure("a.example", true).await;
        limiter.widen_all(1000.0).await;
        assert_eq!(limiter.current_delay("a.example").await, limiter.config.max_delay);
    }

    #[tokio::test]
    async fn reset_domain_clears_accumulated_penalty() {
        let limiter = RateLimiter::new(config());
        limiter.record_failure("example.com", true).await;
        assert!(limiter.current_delay("example.com").await > Duration::from_millis(1000));
        limiter.reset_domain("example.com").await;
        assert_eq!(
            limiter.current_delay("example.com").await,
            Duration::from_millis(1000)
        );
    }
}
