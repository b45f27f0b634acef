// src/scrape/chain.rs
//
// The source strategy chain: sources in priority order, one fetch + extract
// attempt each, accept or advance, static fallback once everything is
// exhausted. Every failure mode is recovered here; resolve() cannot fail.

use chrono::Utc;
use metrics::counter;

use crate::scrape::config::ScrapeConfig;
use crate::scrape::extract::extract;
use crate::scrape::fallback::fallback_items;
use crate::scrape::normalize::normalize;
use crate::scrape::sources::{SourceDescriptor, SOURCES};
use crate::scrape::types::{MarkupFetcher, SourceId, TrendResult};

pub struct TrendChain {
    fetcher: Box<dyn MarkupFetcher>,
    config: ScrapeConfig,
    sources: &'static [SourceDescriptor],
}

impl TrendChain {
    pub fn new(fetcher: Box<dyn MarkupFetcher>, config: ScrapeConfig) -> Self {
        Self {
            fetcher,
            config,
            sources: SOURCES,
        }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Resolves trends for a country, trying each source in order and
    /// degrading to the static fallback table. Sequential by design: once an
    /// early source succeeds, no further outbound calls are made. The whole
    /// pass runs under the configured wall-clock ceiling.
    pub async fn resolve(&self, country: &str, limit: usize) -> TrendResult {
        let country = country.trim().to_lowercase();
        let budget = self.config.overall_budget();
        match tokio::time::timeout(budget, self.try_sources(&country, limit)).await {
            Ok(Some(result)) => result,
            Ok(None) => {
                tracing::warn!(%country, "all sources exhausted, serving fallback");
                self.fallback(&country, limit)
            }
            Err(_) => {
                tracing::warn!(%country, ?budget, "request budget elapsed, serving fallback");
                self.fallback(&country, limit)
            }
        }
    }

    async fn try_sources(&self, country: &str, limit: usize) -> Option<TrendResult> {
        for source in self.sources {
            counter!("scrape_sources_tried_total").increment(1);

            let markup = match self.fetcher.fetch(source, country).await {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(error = %e, source = %source.id, "fetch failed, advancing");
                    counter!("scrape_fetch_errors_total").increment(1);
                    continue;
                }
            };

            let items = extract(&markup, source, limit, &self.config);
            if items.len() < self.config.accept_threshold {
                // A near-empty extraction is a strong signal the heuristic
                // matched unrelated markup; do not trust it.
                tracing::warn!(
                    source = %source.id,
                    found = items.len(),
                    threshold = self.config.accept_threshold,
                    "extraction below acceptance threshold, advancing"
                );
                counter!("scrape_source_rejected_total").increment(1);
                continue;
            }

            tracing::info!(source = %source.id, count = items.len(), %country, "source accepted");
            return Some(TrendResult {
                source: source.id,
                country: country.to_string(),
                generated_at: Utc::now(),
                items: normalize(items, limit),
            });
        }
        None
    }

    pub fn fallback(&self, country: &str, limit: usize) -> TrendResult {
        counter!("scrape_fallback_total").increment(1);
        TrendResult {
            source: SourceId::Fallback,
            country: country.to_string(),
            generated_at: Utc::now(),
            items: fallback_items(limit),
        }
    }
}
