//! CLI entrypoint wiring an [`Orchestrator`] to a config file, an event
//! sink, and a stream of newline-delimited JSON commands on stdin (spec.md
//! §6's "admin control channel" — the event-bus-delivered `scraping-tasks`
//! topic is the same [`scrape_orchestrator::Command`] shape, consumed the
//! same way by whatever topic-subscription glue a deployment wires up).
//!
//! The individual scraper backends are out of scope for this core (spec.md
//! §1); this binary wires a no-op [`ScraperFactory`] per backend kind so
//! the control plane is runnable standalone for smoke-testing the
//! scheduling, rate-limiting, and quota machinery. A real deployment
//! replaces `stub_factories` with factories that build actual
//! `ScraperContract` implementations.

use async_trait::async_trait;
use clap::Parser;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use scrape_core::{BackendKind, ScrapeError, ScrapeOutcome, ScrapeRequest};
use scrape_events::JsonlSink;
use scrape_orchestrator::{dispatch, Command, Orchestrator, OrchestratorConfig};
use scrape_pool::{FnFactory, ScraperContract, ScraperFactory};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "scrape control plane orchestrator", long_about = None)]
struct Args {
    /// Path to a TOML config file; overridden by `SCRAPE_` prefixed
    /// environment variables (spec.md §6).
    #[arg(long, default_value = "orchestrator.toml")]
    config: String,

    #[arg(long, default_value = "info")]
    log_level: String,
}

struct NoopScraper;

#[async_trait]
impl ScraperContract for NoopScraper {
    async fn scrape(&self, _request: &ScrapeRequest, _cancel: CancellationToken) -> Result<ScrapeOutcome, ScrapeError> {
        Ok(ScrapeOutcome::default())
    }
}

fn stub_factories() -> HashMap<BackendKind, Arc<dyn ScraperFactory>> {
    let kinds = [
        BackendKind::MeteredApi,
        BackendKind::Rss,
        BackendKind::Government,
        BackendKind::CompanyPage,
        BackendKind::BrowserDriven,
    ];
    kinds
        .into_iter()
        .map(|kind| {
            let factory: Arc<dyn ScraperFactory> = Arc::new(FnFactory(|| Box::new(NoopScraper) as Box<dyn ScraperContract>));
            (kind, factory)
        })
        .collect()
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config: OrchestratorConfig = Figment::new()
        .merge(Toml::file(&args.config))
        .merge(Env::prefixed("SCRAPE_"))
        .extract()
        .unwrap_or_else(|err| {
            tracing::warn!(%err, "no usable config file found, falling back to defaults");
            OrchestratorConfig::default()
        });

    let sink = Box::new(JsonlSink::new(config.event_bus_endpoint.clone()));
    let orchestrator = Arc::new(Orchestrator::new(config, stub_factories(), sink));
    orchestrator.start().await;
    tracing::info!("orchestrator started, reading commands from stdin");

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) if !line.trim().is_empty() => {
                        match Command::from_json(line.as_bytes()) {
                            Ok(command) => dispatch(&orchestrator, command).await,
                            Err(err) => tracing::warn!(%err, %line, "rejected malformed command"),
                        }
                    }
                    Ok(Some(_)) => {}
                    Ok(None) => {
                        tracing::info!("stdin closed, draining");
                        break;
                    }
                    Err(err) => {
                        tracing::error!(%err, "error reading command stream");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("received ctrl+c, draining");
                break;
            }
        }
    }

    orchestrator.drain().await;
    tracing::info!("shutdown complete");
}
