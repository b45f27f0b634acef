// src/scrape/fetch.rs
use std::time::Duration;

use async_trait::async_trait;

use crate::scrape::sources::SourceDescriptor;
use crate::scrape::types::{FetchError, MarkupFetcher};

/// Bounded-time retrieval of raw markup over HTTP. No retries here; trying
/// the next source is the chain's job.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl MarkupFetcher for HttpFetcher {
    async fn fetch(&self, source: &SourceDescriptor, country: &str) -> Result<String, FetchError> {
        let url = source.url_for(country);
        tracing::debug!(source = %source.id, %url, "fetching upstream markup");

        let mut req = self.client.get(&url).timeout(self.timeout);
        for (k, v) in source.headers {
            req = req.header(*k, *v);
        }

        let resp = req.send().await.map_err(classify)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }
        resp.text().await.map_err(classify)
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(e.to_string())
    }
}
