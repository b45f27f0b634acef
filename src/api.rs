// src/api.rs
//
// Thin HTTP boundary over the scrape chain. The contract here is blunt:
// always HTTP 200, always a `trends` array, CORS open to everyone.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;

use crate::scrape::chain::TrendChain;
use crate::scrape::fallback::fallback_items;
use crate::scrape::types::{SourceId, TrendItem, TrendResult};

const DEFAULT_COUNTRY: &str = "japan";
const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 25;

#[derive(Clone)]
pub struct AppState {
    chain: Arc<TrendChain>,
}

pub fn router(chain: Arc<TrendChain>) -> Router {
    let state = AppState { chain };
    Router::new()
        .route("/", get(trending))
        .route("/trending", get(trending))
        .route("/health", get(|| async { "ok" }))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Build the same Router the binary uses, over live HTTP sources.
pub fn create_router() -> Router {
    router(Arc::new(crate::scrape::default_chain()))
}

#[derive(Debug, serde::Deserialize)]
pub struct TrendingQuery {
    country: Option<String>,
    count: Option<String>,
}

/// Request-scoped parameters with defaults applied and the limit clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    pub country: String,
    pub limit: usize,
}

impl RequestParams {
    pub fn from_query(q: TrendingQuery) -> Self {
        let country = q
            .country
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());
        let limit = q
            .count
            .as_deref()
            .and_then(|c| c.trim().parse::<i64>().ok())
            .map(|n| n.clamp(1, MAX_LIMIT as i64) as usize)
            .unwrap_or(DEFAULT_LIMIT);
        Self { country, limit }
    }
}

#[derive(Debug, serde::Serialize)]
struct TrendingResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    country: String,
    source: SourceId,
    timestamp: DateTime<Utc>,
    count: usize,
    trends: Vec<TrendItem>,
}

impl TrendingResponse {
    fn ok(result: TrendResult) -> Self {
        Self {
            success: true,
            error: None,
            note: None,
            country: result.country,
            source: result.source,
            timestamp: result.generated_at,
            count: result.items.len(),
            trends: result.items,
        }
    }

    /// Built when something outside the normal chain flow blew up. Still a
    /// usable payload; the `trends` field is never omitted.
    fn degraded(error: String, params: &RequestParams) -> Self {
        let trends = fallback_items(params.limit);
        Self {
            success: false,
            error: Some(error),
            note: Some("Using fallback data".to_string()),
            country: params.country.trim().to_lowercase(),
            source: SourceId::Fallback,
            timestamp: Utc::now(),
            count: trends.len(),
            trends,
        }
    }
}

async fn trending(
    State(state): State<AppState>,
    Query(q): Query<TrendingQuery>,
) -> Json<TrendingResponse> {
    let params = RequestParams::from_query(q);

    // resolve() recovers every expected failure itself; the spawn isolates
    // the one remaining case (a panic) so the envelope contract holds.
    let chain = state.chain.clone();
    let (country, limit) = (params.country.clone(), params.limit);
    let outcome = tokio::spawn(async move { chain.resolve(&country, limit).await }).await;

    match outcome {
        Ok(result) => Json(TrendingResponse::ok(result)),
        Err(e) => {
            tracing::error!(error = ?e, "trend resolution aborted unexpectedly");
            Json(TrendingResponse::degraded(e.to_string(), &params))
        }
    }
}
