use thiserror::Error;

/// `before_call` has exactly one failure mode: the circuit is open for this
/// domain. Everything else a caller needs lives on
/// [`scrape_core::ScrapeError`] once the call itself has been attempted.
#[derive(Debug, Clone, Error)]
#[error("circuit open for {domain}")]
pub struct CircuitOpen {
    pub domain: String,
}

impl From<CircuitOpen> for scrape_core::ScrapeError {
    fn from(err: CircuitOpen) -> Self {
        scrape_core::ScrapeError::CircuitOpen { domain: err.domain }
    }
}
