// src/scrape/normalize.rs
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::scrape::types::{TrendItem, VOLUME_SENTINEL};

fn volume_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"^\d+(\.\d+)?[KkMm]?$").unwrap())
}

/// True for tokens like "12", "3.5M", "120k" plus the literal sentinel.
pub fn is_volume_token(token: &str) -> bool {
    token == VOLUME_SENTINEL || volume_re().is_match(token)
}

/// Shapes a raw volume candidate: accepted tokens keep their digits with the
/// K/M suffix upper-cased; anything else becomes the sentinel.
pub fn normalize_volume(token: Option<&str>) -> String {
    match token.map(str::trim) {
        Some(t) if is_volume_token(t) => t.to_uppercase(),
        _ => VOLUME_SENTINEL.to_string(),
    }
}

/// Final shaping stage: truncate to `limit`, re-assign 1-based contiguous
/// ranks (only the relative order of extracted items is trusted), and fill
/// missing volumes with the sentinel. Names pass through untouched; they are
/// opaque display text and may repeat.
pub fn normalize(mut items: Vec<TrendItem>, limit: usize) -> Vec<TrendItem> {
    items.truncate(limit);
    for (i, item) in items.iter_mut().enumerate() {
        item.rank = i as u32 + 1;
        if item.volume.trim().is_empty() || !is_volume_token(item.volume.trim()) {
            item.volume = VOLUME_SENTINEL.to_string();
        }
    }
    items
}
