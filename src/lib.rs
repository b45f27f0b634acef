// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod metrics;
pub mod scrape;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, router};
pub use crate::scrape::get_trends;
pub use crate::scrape::types::{SourceId, TrendItem, TrendResult};
