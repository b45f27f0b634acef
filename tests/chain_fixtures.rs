// tests/chain_fixtures.rs
//
// Source-chain behavior against fixture markup, no sockets involved.
// A fixture fetcher stands in for HTTP: sources with no page registered
// fail as timeouts, everything else returns canned markup.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use twitter_trends_api::scrape::chain::TrendChain;
use twitter_trends_api::scrape::config::ScrapeConfig;
use twitter_trends_api::scrape::fallback::fallback_items;
use twitter_trends_api::scrape::sources::SourceDescriptor;
use twitter_trends_api::scrape::types::{FetchError, MarkupFetcher, SourceId};

struct FixtureFetcher {
    pages: HashMap<SourceId, String>,
    calls: Arc<Mutex<Vec<SourceId>>>,
}

impl FixtureFetcher {
    fn new(pages: &[(SourceId, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(id, page)| (*id, page.to_string()))
                .collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn none() -> Self {
        Self::new(&[])
    }
}

#[async_trait]
impl MarkupFetcher for FixtureFetcher {
    async fn fetch(&self, source: &SourceDescriptor, _country: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(source.id);
        self.pages
            .get(&source.id)
            .cloned()
            .ok_or(FetchError::Timeout)
    }
}

fn chain_with(pages: &[(SourceId, &str)]) -> TrendChain {
    TrendChain::new(Box::new(FixtureFetcher::new(pages)), ScrapeConfig::default())
}

const TRENDS24_FIVE: &str = r#"
    <h2>few minutes ago</h2>
    <ol>
      <li><a>年収の壁トピック</a> 12K</li>
      <li><a>#hololive</a> 8K</li>
      <li><a>引き上げ議論</a> 3.5M</li>
      <li><a>#GameWith</a></li>
      <li><a>ブルスカ移行</a> 500</li>
    </ol>"#;

const TRENDS24_SINGLE: &str = r#"
    <h2>few minutes ago</h2>
    <ol><li><a>孤独なトピック</a> 12K</li></ol>"#;

const NITTER_CARDS: &str = r#"
    <a class="trend-item" href="/s"><span class="trend-name">#冬コミ</span>
      <span class="tweet-count">45K</span></a>
    <a class="trend-item" href="/s"><span class="trend-name">大雪警報</span>
      <span class="tweet-count">9K</span></a>
    <a class="trend-item" href="/s"><span class="trend-name">W杯予選</span>
      <span class="tweet-count">nope</span></a>"#;

#[tokio::test]
async fn primary_source_wins_and_secondary_is_never_fetched() {
    let fetcher = FixtureFetcher::new(&[
        (SourceId::Trends24, TRENDS24_FIVE),
        (SourceId::Nitter, NITTER_CARDS),
    ]);
    let calls = fetcher.calls.clone();
    let chain = TrendChain::new(Box::new(fetcher), ScrapeConfig::default());

    let result = chain.resolve("japan", 10).await;
    assert_eq!(result.source, SourceId::Trends24);
    assert_eq!(result.items.len(), 5);
    assert_eq!(result.items[0].name, "年収の壁トピック");
    assert_eq!(result.items[0].volume, "12K");
    assert_eq!(result.items[3].volume, "N/A");

    // Sequential chain: once trends24 is accepted, nitter stays untouched.
    assert_eq!(*calls.lock().unwrap(), vec![SourceId::Trends24]);
}

#[tokio::test]
async fn single_item_extraction_advances_to_next_source() {
    let chain = chain_with(&[
        (SourceId::Trends24, TRENDS24_SINGLE),
        (SourceId::Nitter, NITTER_CARDS),
    ]);

    let result = chain.resolve("japan", 10).await;
    assert_eq!(result.source, SourceId::Nitter);
    assert_eq!(result.items.len(), 3);
    assert_eq!(result.items[0].name, "#冬コミ");
    assert_eq!(result.items[2].volume, "N/A");
}

#[tokio::test]
async fn all_sources_failing_serves_fallback_without_panicking() {
    let chain = TrendChain::new(Box::new(FixtureFetcher::none()), ScrapeConfig::default());

    let result = chain.resolve("japan", 4).await;
    assert_eq!(result.source, SourceId::Fallback);
    assert_eq!(result.items, fallback_items(4));
}

#[tokio::test]
async fn structureless_markup_everywhere_also_ends_in_fallback() {
    let page = "<html><body><p>maintenance window</p></body></html>";
    let chain = chain_with(&[(SourceId::Trends24, page), (SourceId::Nitter, page)]);

    let result = chain.resolve("usa", 6).await;
    assert_eq!(result.source, SourceId::Fallback);
    assert_eq!(result.items, fallback_items(6));
}

#[tokio::test]
async fn every_limit_is_honored_with_contiguous_ranks() {
    for limit in 1..=25usize {
        let chain = chain_with(&[(SourceId::Trends24, TRENDS24_FIVE)]);
        let result = chain.resolve("japan", limit).await;
        assert!(result.items.len() <= limit);
        for (i, item) in result.items.iter().enumerate() {
            assert_eq!(item.rank as usize, i + 1);
        }
    }
}

#[tokio::test]
async fn country_token_is_lowercased_on_the_result() {
    let chain = chain_with(&[(SourceId::Trends24, TRENDS24_FIVE)]);
    let result = chain.resolve("  Japan ", 5).await;
    assert_eq!(result.country, "japan");
}

#[tokio::test]
async fn exhausted_budget_degrades_to_fallback() {
    struct StalledFetcher;

    #[async_trait]
    impl MarkupFetcher for StalledFetcher {
        async fn fetch(
            &self,
            _source: &SourceDescriptor,
            _country: &str,
        ) -> Result<String, FetchError> {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok(String::new())
        }
    }

    let config = ScrapeConfig {
        overall_budget_secs: 0,
        ..ScrapeConfig::default()
    };
    let chain = TrendChain::new(Box::new(StalledFetcher), config);

    let result = chain.resolve("japan", 3).await;
    assert_eq!(result.source, SourceId::Fallback);
    assert_eq!(result.items.len(), 3);
}
