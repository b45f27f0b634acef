// src/scrape/types.rs
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::scrape::sources::SourceDescriptor;

/// Sentinel volume token used whenever no usable tweet count was found.
pub const VOLUME_SENTINEL: &str = "N/A";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct TrendItem {
    pub rank: u32,
    pub name: String,
    /// Approximate tweet count, e.g. "12K" / "3.5M" / "N/A".
    #[serde(rename = "tweets")]
    pub volume: String,
}

impl TrendItem {
    pub fn new(rank: u32, name: impl Into<String>, volume: impl Into<String>) -> Self {
        Self {
            rank,
            name: name.into(),
            volume: volume.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Trends24,
    Nitter,
    Fallback,
}

impl SourceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Trends24 => "trends24",
            SourceId::Nitter => "nitter",
            SourceId::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct TrendResult {
    pub source: SourceId,
    pub country: String,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<TrendItem>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream responded with HTTP {0}")]
    Http(u16),
    #[error("network error: {0}")]
    Network(String),
}

/// Retrieves raw markup for one source. The HTTP implementation lives in
/// `scrape::fetch`; tests substitute fixture fetchers.
#[async_trait::async_trait]
pub trait MarkupFetcher: Send + Sync {
    async fn fetch(&self, source: &SourceDescriptor, country: &str) -> Result<String, FetchError>;
}
