// src/scrape/extract.rs
//
// The extractor set: independent parsing heuristics over a tolerant HTML
// tree. Each heuristic either finds a ranked trend list or comes back empty;
// nothing in here returns an error, so one bad heuristic can never abort the
// source chain.

use metrics::{counter, histogram};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

use crate::scrape::config::ScrapeConfig;
use crate::scrape::normalize::{is_volume_token, normalize_volume};
use crate::scrape::sources::{Heuristic, SourceDescriptor};
use crate::scrape::types::{TrendItem, VOLUME_SENTINEL};

static SEL_A: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static SEL_LI: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());
static SEL_TR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static SEL_CONTAINERS: Lazy<Selector> = Lazy::new(|| Selector::parse("ol, ul, table").unwrap());

/// Containers smaller than this are not worth scanning generically.
const MIN_CONTAINER_ITEMS: usize = 3;

/// Applies the source's heuristics in order and returns the first result
/// meeting the acceptance threshold, or the best undersized result so the
/// chain can judge it (and advance) itself.
pub fn extract(
    markup: &str,
    source: &SourceDescriptor,
    limit: usize,
    cfg: &ScrapeConfig,
) -> Vec<TrendItem> {
    let t0 = std::time::Instant::now();
    let doc = Html::parse_document(markup);

    // Decode at least threshold-many entries even for tiny limits, so a
    // request for one trend can still tell a healthy source from a broken
    // one. The normalizer truncates afterwards.
    let cap = limit.max(cfg.accept_threshold);

    let mut best: Vec<TrendItem> = Vec::new();
    for heuristic in source.heuristics {
        let items = apply_heuristic(&doc, *heuristic, source, cap, cfg);
        if items.len() >= cfg.accept_threshold {
            best = items;
            break;
        }
        if items.len() > best.len() {
            best = items;
        }
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("scrape_parse_ms").record(ms);
    counter!("scrape_items_extracted_total").increment(best.len() as u64);
    best
}

fn apply_heuristic(
    doc: &Html,
    heuristic: Heuristic,
    source: &SourceDescriptor,
    limit: usize,
    cfg: &ScrapeConfig,
) -> Vec<TrendItem> {
    match heuristic {
        Heuristic::AnchoredList => anchored(doc, source.anchor, &["ol", "ul"])
            .map(|el| decode_list(el, limit, cfg))
            .unwrap_or_default(),
        Heuristic::AnchoredTable => anchored(doc, source.anchor, &["table"])
            .map(|el| decode_table(el, limit, cfg))
            .unwrap_or_default(),
        Heuristic::GenericContainers => generic_containers(doc, limit, cfg),
        Heuristic::LooseLinks => loose_links(doc, source.domain_token, limit, cfg),
        Heuristic::Css { item, name, volume } => css_pairs(doc, item, name, volume, limit, cfg),
    }
}

/// Finds the nearest element with one of `names` that follows, in document
/// order, a text node containing `anchor` (case-insensitive).
fn anchored<'a>(doc: &'a Html, anchor: &str, names: &[&str]) -> Option<ElementRef<'a>> {
    let anchor_lc = anchor.to_lowercase();
    let mut seen_anchor = false;
    for node in doc.root_element().descendants() {
        match node.value() {
            Node::Text(t) if !seen_anchor => {
                if t.text.to_lowercase().contains(&anchor_lc) {
                    seen_anchor = true;
                }
            }
            Node::Element(el) if seen_anchor => {
                if names.contains(&el.name()) {
                    return ElementRef::wrap(node);
                }
            }
            _ => {}
        }
    }
    None
}

/// Decodes an ol/ul: one candidate item per li.
fn decode_list(list: ElementRef<'_>, limit: usize, cfg: &ScrapeConfig) -> Vec<TrendItem> {
    let mut out = Vec::new();
    for li in list.select(&SEL_LI).take(limit) {
        if let Some(item) = decode_entry(li, cfg) {
            out.push(with_rank(out.len(), item));
        }
    }
    out
}

/// Decodes a table: name from the first link per row, volume from the first
/// freestanding count token in the row that is not the name itself.
fn decode_table(table: ElementRef<'_>, limit: usize, cfg: &ScrapeConfig) -> Vec<TrendItem> {
    let mut out = Vec::new();
    for row in table.select(&SEL_TR).take(limit) {
        let Some(name) = row
            .select(&SEL_A)
            .next()
            .map(element_text)
            .filter(|n| acceptable_name(n, cfg))
        else {
            continue; // header rows and separator rows have no link
        };
        let volume = first_volume_token(row, &name);
        out.push(with_rank(out.len(), (name, volume)));
    }
    out
}

/// Scans every list/table container of minimum size with the shared decoder,
/// accepting the first container that yields more than two valid items.
fn generic_containers(doc: &Html, limit: usize, cfg: &ScrapeConfig) -> Vec<TrendItem> {
    for container in doc.select(&SEL_CONTAINERS) {
        let is_table = container.value().name() == "table";
        let entry_count = if is_table {
            container.select(&SEL_TR).count()
        } else {
            container.select(&SEL_LI).count()
        };
        if entry_count < MIN_CONTAINER_ITEMS {
            continue;
        }
        let items = if is_table {
            decode_table(container, limit, cfg)
        } else {
            decode_list(container, limit, cfg)
        };
        if items.len() > 2 {
            return items;
        }
    }
    Vec::new()
}

/// Last resort: any hyperlink text in the document that looks like a topic.
/// Volume is unknowable at this level, so every item gets the sentinel.
fn loose_links(doc: &Html, domain_token: &str, limit: usize, cfg: &ScrapeConfig) -> Vec<TrendItem> {
    let mut out = Vec::new();
    for a in doc.select(&SEL_A) {
        if out.len() >= limit {
            break;
        }
        let name = element_text(a);
        if !acceptable_name(&name, cfg) || name.contains(domain_token) {
            continue;
        }
        out.push(with_rank(out.len(), (name, VOLUME_SENTINEL.to_string())));
    }
    out
}

/// Selector-pair extraction for sources exposing stable class names.
fn css_pairs(
    doc: &Html,
    item_sel: &str,
    name_sel: &str,
    volume_sel: &str,
    limit: usize,
    cfg: &ScrapeConfig,
) -> Vec<TrendItem> {
    let (Ok(items), Ok(names), Ok(volumes)) = (
        Selector::parse(item_sel),
        Selector::parse(name_sel),
        Selector::parse(volume_sel),
    ) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for el in doc.select(&items).take(limit) {
        let Some(name) = el
            .select(&names)
            .next()
            .map(element_text)
            .filter(|n| acceptable_name(n, cfg))
        else {
            continue;
        };
        let volume = el.select(&volumes).next().map(element_text);
        out.push(with_rank(
            out.len(),
            (name, normalize_volume(volume.as_deref())),
        ));
    }
    out
}

/// Shared per-entry decoder: link text preferred, falling back to the entry's
/// own leading text; volume from the first count-shaped token.
fn decode_entry(entry: ElementRef<'_>, cfg: &ScrapeConfig) -> Option<(String, String)> {
    let name = match entry.select(&SEL_A).next() {
        Some(a) => element_text(a),
        None => entry
            .text()
            .map(str::trim)
            .find(|t| !t.is_empty())
            .unwrap_or_default()
            .to_string(),
    };
    if !acceptable_name(&name, cfg) {
        return None;
    }
    Some((name.clone(), first_volume_token(entry, &name)))
}

fn first_volume_token(entry: ElementRef<'_>, name: &str) -> String {
    let text = entry.text().collect::<Vec<_>>().join(" ");
    let token = text
        .split_whitespace()
        .find(|t| *t != name && is_volume_token(t));
    normalize_volume(token)
}

fn acceptable_name(name: &str, cfg: &ScrapeConfig) -> bool {
    name.chars().count() >= cfg.min_name_len
        && !looks_like_url(name)
        && !cfg.is_noise(name)
}

fn looks_like_url(name: &str) -> bool {
    name.contains("http") || name.contains("www.") || name.contains("href=")
}

fn with_rank(position: usize, (name, volume): (String, String)) -> TrendItem {
    TrendItem::new(position as u32 + 1, name, volume)
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
