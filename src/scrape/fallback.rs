// src/scrape/fallback.rs
//
// Static trend list served when every upstream is exhausted. Bundled with the
// deployment, needs no network, cannot fail. This is what guarantees the
// "always 200 with a non-null trends array" contract.

use crate::scrape::types::TrendItem;

const FALLBACK: &[(&str, &str)] = &[
    ("年収の壁", "23K"),
    ("無期徴役", "16K"),
    ("所得制限", "N/A"),
    ("#hololivefesEXPO26", "N/A"),
    ("引き上げ", "28K"),
    ("ブルスカ", "N/A"),
    ("#GameWith", "N/A"),
    ("#ラストマン", "N/A"),
    ("#LINEマンガでポイ活", "50K"),
    ("#ウマ娘MVP人気投票", "N/A"),
];

/// The fallback table capped to `limit`, ranks 1-based and contiguous.
pub fn fallback_items(limit: usize) -> Vec<TrendItem> {
    FALLBACK
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, (name, volume))| TrendItem::new(i as u32 + 1, *name, *volume))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_at_least_ten_entries() {
        assert!(fallback_items(usize::MAX).len() >= 10);
    }

    #[test]
    fn capped_and_contiguously_ranked() {
        let items = fallback_items(3);
        assert_eq!(items.len(), 3);
        assert_eq!(
            items.iter().map(|i| i.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(items[0].name, "年収の壁");
        assert_eq!(items[0].volume, "23K");
    }
}
