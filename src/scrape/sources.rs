// src/scrape/sources.rs
//
// Static source configuration: which upstreams we scrape, in which order,
// and which extraction heuristics apply to each. Loaded once, never mutated.

use crate::scrape::types::SourceId;

/// One parsing strategy for locating trend items within a source's markup.
/// Tried in the order listed on the descriptor; first acceptable result wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// Anchor-text search, then the nearest following ol/ul.
    AnchoredList,
    /// Anchor-text search, then the nearest following table.
    AnchoredTable,
    /// Any sufficiently large list/table container in the document.
    GenericContainers,
    /// Whole-document link scan; volume is always the sentinel.
    LooseLinks,
    /// Selector-pair extraction for sources with stable class names.
    Css {
        item: &'static str,
        name: &'static str,
        volume: &'static str,
    },
}

pub struct SourceDescriptor {
    pub id: SourceId,
    /// URL template; `{country}` is replaced by the lower-cased country token.
    pub url_template: &'static str,
    /// Per-country route overrides; countries not listed use the template.
    pub routes: &'static [(&'static str, &'static str)],
    pub headers: &'static [(&'static str, &'static str)],
    /// Textual anchor preceding the trend listing (case-insensitive).
    pub anchor: &'static str,
    /// Substring identifying the source's own navigation links as noise.
    pub domain_token: &'static str,
    pub heuristics: &'static [Heuristic],
}

impl SourceDescriptor {
    /// Builds the request URL for a country. Unknown countries fall back to
    /// the template route rather than erroring.
    pub fn url_for(&self, country: &str) -> String {
        let token = country.trim().to_lowercase();
        for (c, url) in self.routes {
            if *c == token {
                return (*url).to_string();
            }
        }
        self.url_template.replace("{country}", &token)
    }
}

// Some upstreams reject non-browser clients outright.
const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "User-Agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
    ),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.5"),
    ("Cache-Control", "no-cache"),
];

/// Process-wide source table, primary aggregator first.
pub static SOURCES: &[SourceDescriptor] = &[
    SourceDescriptor {
        id: SourceId::Trends24,
        url_template: "https://trends24.in/{country}/",
        routes: &[],
        headers: BROWSER_HEADERS,
        anchor: "few minutes ago",
        domain_token: "trends24",
        heuristics: &[
            Heuristic::AnchoredList,
            Heuristic::AnchoredTable,
            Heuristic::GenericContainers,
            Heuristic::LooseLinks,
        ],
    },
    SourceDescriptor {
        id: SourceId::Nitter,
        url_template: "https://nitter.net/trends",
        routes: &[
            ("japan", "https://nitter.net/trends/jp"),
            ("usa", "https://nitter.net/trends/us"),
            ("india", "https://nitter.net/trends/in"),
            ("uk", "https://nitter.net/trends/gb"),
        ],
        headers: BROWSER_HEADERS,
        anchor: "trending",
        domain_token: "nitter",
        heuristics: &[
            Heuristic::Css {
                item: "a.trend-item",
                name: ".trend-name",
                volume: ".tweet-count",
            },
            Heuristic::GenericContainers,
            Heuristic::LooseLinks,
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_substitutes_and_lowercases_country() {
        let t24 = &SOURCES[0];
        assert_eq!(t24.url_for("Japan"), "https://trends24.in/japan/");
        assert_eq!(t24.url_for(" usa "), "https://trends24.in/usa/");
    }

    #[test]
    fn unknown_country_uses_default_route() {
        let nitter = &SOURCES[1];
        assert_eq!(nitter.url_for("japan"), "https://nitter.net/trends/jp");
        assert_eq!(nitter.url_for("brazil"), "https://nitter.net/trends");
    }

    #[test]
    fn every_source_registers_between_two_and_four_heuristics() {
        for s in SOURCES {
            assert!((2..=4).contains(&s.heuristics.len()), "source {}", s.id);
        }
    }
}
