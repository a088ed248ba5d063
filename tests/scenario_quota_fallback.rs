//! End-to-end: a low-value query under free-tier high-value-only mode gets
//! refused by the metered backend and reroutes to the source's native
//! fallback instead of failing the task outright (spec.md §8 scenario 1).

use async_trait::async_trait;
use scrape_core::{BackendKind, Filters, ScrapeError, ScrapeOutcome, ScrapeRequest, Task};
use scrape_events::JsonlSink;
use scrape_orchestrator::{Orchestrator, OrchestratorConfig};
use scrape_pool::{FnFactory, ScraperContract, ScraperFactory};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct EchoScraper;

#[async_trait]
impl ScraperContract for EchoScraper {
    async fn scrape(&self, _request: &ScrapeRequest, _cancel: CancellationToken) -> Result<ScrapeOutcome, ScrapeError> {
        Ok(ScrapeOutcome::default())
    }
}

fn factories() -> HashMap<BackendKind, Arc<dyn ScraperFactory>> {
    let mut factories: HashMap<BackendKind, Arc<dyn ScraperFactory>> = HashMap::new();
    for kind in [BackendKind::MeteredApi, BackendKind::Rss, BackendKind::CompanyPage] {
        factories.insert(kind, Arc::new(FnFactory(|| Box::new(EchoScraper) as Box<dyn ScraperContract>)));
    }
    factories
}

#[tokio::test]
async fn low_value_query_falls_back_to_rss_instead_of_failing() {
    let dir = tempfile::tempdir().unwrap();
    let sink = Box::new(JsonlSink::new(dir.path().join("events.jsonl")));

    let config = OrchestratorConfig {
        max_concurrent_scrapers: 5,
        use_metered_first: true,
        metered_monthly_quota: 5,
        metered_free_tier_mode: true,
        metered_high_value_only: true,
        settings_store_path: dir.path().join("quota.json").to_string_lossy().to_string(),
        ..OrchestratorConfig::default()
    };

    let orchestrator = Arc::new(Orchestrator::new(config, factories(), sink));
    orchestrator.start().await;

    let mut task = Task::new("t1", "rss", 5);
    task.filters = Filters {
        keywords: vec!["random word".to_string()],
        ..Default::default()
    };
    orchestrator.submit(task).await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    orchestrator.drain().await;

    // The refused admission never touched the ledger; only the rerouted
    // native-backend pass ran, which doesn't debit quota at all.
    assert_eq!(orchestrator.quota_remaining().await, 5);
}
