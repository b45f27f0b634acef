// src/scrape/mod.rs
pub mod chain;
pub mod config;
pub mod extract;
pub mod fallback;
pub mod fetch;
pub mod normalize;
pub mod sources;
pub mod types;

use metrics::{describe_counter, describe_histogram};
use once_cell::sync::{Lazy, OnceCell};

use crate::scrape::chain::TrendChain;
use crate::scrape::config::ScrapeConfig;
use crate::scrape::fetch::HttpFetcher;
use crate::scrape::types::TrendResult;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "scrape_sources_tried_total",
            "Sources attempted across all requests."
        );
        describe_counter!("scrape_fetch_errors_total", "Upstream fetch failures.");
        describe_counter!(
            "scrape_source_rejected_total",
            "Sources rejected for falling below the acceptance threshold."
        );
        describe_counter!(
            "scrape_fallback_total",
            "Requests served from the static fallback table."
        );
        describe_counter!(
            "scrape_items_extracted_total",
            "Trend items produced by extraction."
        );
        describe_histogram!("scrape_parse_ms", "Markup parse + extraction time in milliseconds.");
    });
}

/// Builds a chain over live HTTP with configuration from the environment.
pub fn default_chain() -> TrendChain {
    ensure_metrics_described();
    let config = ScrapeConfig::load_default();
    let fetcher = HttpFetcher::new(config.fetch_timeout());
    TrendChain::new(Box::new(fetcher), config)
}

static SHARED_CHAIN: Lazy<TrendChain> = Lazy::new(default_chain);

/// The one operation the HTTP boundary consumes: trends for a country,
/// capped to `limit`. Never fails; degrades to fallback data instead.
pub async fn get_trends(country: &str, limit: usize) -> TrendResult {
    SHARED_CHAIN.resolve(country, limit).await
}
