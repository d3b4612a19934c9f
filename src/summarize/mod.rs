// src/summarize/mod.rs
//! Summarizer: news items in, headline + up to three key points out.
//!
//! The hosted model is optional at every step. Any failure degrades to the
//! first item's title, so a run always has something to post.

pub mod openai;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;

use crate::ingest::types::NewsItem;

pub use openai::OpenAiSummarizer;

pub const MAX_KEY_POINTS: usize = 3;
pub const MAX_LINE_CHARS: usize = 100;

const PLACEHOLDER_HEADLINE: &str = "Latest news update";
const PLACEHOLDER_POINT: &str = "Stay informed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub headline: String,
    pub key_points: Vec<String>,
}

/// Text-generation backend. Returns the raw completion, or `None` on failure.
pub trait SummaryProvider: Send + Sync {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;
    fn name(&self) -> &'static str;
}

pub type DynSummaryProvider = Arc<dyn SummaryProvider>;

/// Always returns `None`; every run uses the title fallback.
pub struct DisabledSummarizer;

impl SummaryProvider for DisabledSummarizer {
    fn complete<'a>(
        &'a self,
        _prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async { None })
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Returns a fixed completion. Handy for local runs and tests.
#[derive(Clone)]
pub struct FixedSummarizer {
    pub fixed: String,
}

impl SummaryProvider for FixedSummarizer {
    fn complete<'a>(
        &'a self,
        _prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        let out = self.fixed.clone();
        Box::pin(async move { Some(out) })
    }
    fn name(&self) -> &'static str {
        "fixed"
    }
}

pub fn build_prompt(items: &[NewsItem]) -> String {
    let listing = items
        .iter()
        .enumerate()
        .map(|(i, it)| format!("{}. {}\nSource: {}", i + 1, it.title, it.source))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Summarize these crypto/tech news items for a single post. Respond exactly in this format:\n\
         HEADLINE: <headline, max {MAX_LINE_CHARS} chars>\n\
         KEY POINTS:\n\
         • <point 1>\n\
         • <point 2>\n\
         • <point 3>\n\
         Each key point max {MAX_LINE_CHARS} characters.\n\n\
         News items:\n{listing}\n"
    )
}

/// Summarize `items`. Never fails.
pub async fn summarize(provider: &dyn SummaryProvider, items: &[NewsItem]) -> Summary {
    let Some(first) = items.first() else {
        return Summary {
            headline: PLACEHOLDER_HEADLINE.to_string(),
            key_points: vec![PLACEHOLDER_POINT.to_string()],
        };
    };

    let prompt = build_prompt(items);
    let Some(raw) = provider.complete(&prompt).await else {
        tracing::warn!(provider = provider.name(), "summary failed; using first title");
        let mut key_points: Vec<String> = items
            .iter()
            .skip(1)
            .take(MAX_KEY_POINTS)
            .map(|i| sanitize_line(&i.title))
            .collect();
        if key_points.is_empty() {
            key_points.push(PLACEHOLDER_POINT.to_string());
        }
        return Summary {
            headline: first.title.clone(),
            key_points,
        };
    };

    tracing::debug!(provider = provider.name(), raw = %raw, "raw summary");
    let (headline, key_points) = parse_completion(&raw);
    let headline = headline.unwrap_or_else(|| first.title.clone());
    let key_points = if key_points.is_empty() {
        items
            .iter()
            .take(MAX_KEY_POINTS)
            .map(|i| sanitize_line(&i.title))
            .collect()
    } else {
        key_points
    };

    Summary {
        headline,
        key_points,
    }
}

/// Pull the `HEADLINE:` line and bullet lines out of a completion.
pub fn parse_completion(raw: &str) -> (Option<String>, Vec<String>) {
    const BULLETS: &[char] = &['•', '-', '*', '▸'];
    let mut headline = None;
    let mut points = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if let Some(rest) = strip_prefix_ci(line, "HEADLINE:") {
            let h = sanitize_line(rest);
            if !h.is_empty() && headline.is_none() {
                headline = Some(h);
            }
        } else if line.starts_with(BULLETS) {
            let p = sanitize_line(line.trim_start_matches(BULLETS));
            if !p.is_empty() && points.len() < MAX_KEY_POINTS {
                points.push(p);
            }
        }
    }
    (headline, points)
}

fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &line[prefix.len()..])
}

/// Single line, collapsed whitespace, at most [`MAX_LINE_CHARS`] characters.
pub fn sanitize_line(input: &str) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_matches(|c: char| c == '"' || c.is_whitespace());
    if trimmed.chars().count() <= MAX_LINE_CHARS {
        trimmed.to_string()
    } else {
        trimmed.chars().take(MAX_LINE_CHARS).collect::<String>().trim_end().to_string()
    }
}
