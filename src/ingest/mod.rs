// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::{NewsItem, NewsProvider};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use std::collections::HashSet;

/// Items taken from each provider per run.
pub const MAX_ITEMS_PER_PROVIDER: usize = 5;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("bot_news_items_total", "News items kept after normalization.");
        describe_counter!(
            "bot_provider_errors_total",
            "News provider fetch/parse errors."
        );
        describe_counter!(
            "bot_provider_fallbacks_total",
            "Times a secondary news provider was used."
        );
    });
}

/// Normalize text: decode entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").expect("static regex"));
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize curly quotes to ASCII
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("static regex"));
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Normalize every item, drop empty titles and repeated titles (case-insensitive).
pub fn normalize_and_dedup(raw: Vec<NewsItem>) -> Vec<NewsItem> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut keep = Vec::with_capacity(raw.len());
    for mut item in raw {
        item.title = normalize_text(&item.title);
        item.description = normalize_text(&item.description);
        if item.description.is_empty() {
            item.description = item.title.clone();
        }
        if item.title.is_empty() || !seen.insert(item.title.to_lowercase()) {
            continue;
        }
        keep.push(item);
    }
    keep
}

/// A primary provider with a secondary to fall back on.
pub struct FallbackSource {
    pub label: &'static str,
    primary: Box<dyn NewsProvider>,
    secondary: Box<dyn NewsProvider>,
}

impl FallbackSource {
    pub fn new(
        label: &'static str,
        primary: Box<dyn NewsProvider>,
        secondary: Box<dyn NewsProvider>,
    ) -> Self {
        Self {
            label,
            primary,
            secondary,
        }
    }

    /// Primary first; on error or an empty list, the secondary. Never fails:
    /// when both are down the result is empty.
    pub async fn fetch(&self) -> Vec<NewsItem> {
        ensure_metrics_described();

        match self.primary.fetch_latest().await {
            Ok(items) if !items.is_empty() => {
                tracing::debug!(source = self.label, provider = self.primary.name(), count = items.len(), "primary provider ok");
                return items;
            }
            Ok(_) => {
                tracing::warn!(source = self.label, provider = self.primary.name(), "primary provider returned nothing; falling back");
            }
            Err(e) => {
                tracing::warn!(error = ?e, source = self.label, provider = self.primary.name(), "primary provider failed; falling back");
                counter!("bot_provider_errors_total", "provider" => self.primary.name()).increment(1);
            }
        }

        counter!("bot_provider_fallbacks_total", "source" => self.label).increment(1);
        match self.secondary.fetch_latest().await {
            Ok(items) => {
                tracing::debug!(source = self.label, provider = self.secondary.name(), count = items.len(), "secondary provider ok");
                items
            }
            Err(e) => {
                tracing::error!(error = ?e, source = self.label, provider = self.secondary.name(), "secondary provider failed");
                counter!("bot_provider_errors_total", "provider" => self.secondary.name()).increment(1);
                Vec::new()
            }
        }
    }
}

/// Fetch every source in order and return the combined, cleaned list.
pub async fn collect_news(sources: &[&FallbackSource]) -> Vec<NewsItem> {
    ensure_metrics_described();

    let mut raw = Vec::new();
    for s in sources {
        raw.extend(s.fetch().await);
    }
    let kept = normalize_and_dedup(raw);
    counter!("bot_news_items_total").increment(kept.len() as u64);
    tracing::info!(count = kept.len(), "news collected");
    kept
}
