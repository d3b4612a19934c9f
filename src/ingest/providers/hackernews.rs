// src/ingest/providers/hackernews.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::ingest::types::{NewsItem, NewsProvider};
use crate::ingest::MAX_ITEMS_PER_PROVIDER;

const BASE: &str = "https://hacker-news.firebaseio.com/v0";

#[derive(Debug, Deserialize)]
struct Story {
    id: u64,
    title: Option<String>,
    url: Option<String>,
    time: Option<i64>,
}

/// Hacker News top stories. No key needed; one request per story.
pub struct HackerNewsProvider {
    client: reqwest::Client,
}

impl Default for HackerNewsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl HackerNewsProvider {
    pub fn new() -> Self {
        Self {
            client: crate::http::build_client(10),
        }
    }

    pub fn parse_top_ids(s: &str) -> Result<Vec<u64>> {
        let ids: Vec<u64> = serde_json::from_str(s).context("parsing hn topstories")?;
        Ok(ids.into_iter().take(MAX_ITEMS_PER_PROVIDER).collect())
    }

    /// `Ok(None)` for deleted items (`null`) and stories without a title.
    pub fn parse_story(s: &str) -> Result<Option<NewsItem>> {
        let Some(story) = serde_json::from_str::<Option<Story>>(s).context("parsing hn item")? else {
            return Ok(None);
        };
        let Some(title) = story.title.filter(|t| !t.trim().is_empty()) else {
            return Ok(None);
        };
        Ok(Some(NewsItem {
            description: title.clone(),
            title,
            url: story
                .url
                .unwrap_or_else(|| format!("https://news.ycombinator.com/item?id={}", story.id)),
            published_at: story
                .time
                .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
                .unwrap_or_else(Utc::now),
            source: "HackerNews".to_string(),
        }))
    }

    /// Keep every story that came back and parsed; a bad item is logged and skipped.
    pub fn collect_stories<I>(bodies: I) -> Vec<NewsItem>
    where
        I: IntoIterator<Item = (u64, Result<String>)>,
    {
        let mut out = Vec::new();
        for (id, body) in bodies {
            match body.and_then(|b| Self::parse_story(&b)) {
                Ok(Some(item)) => out.push(item),
                Ok(None) => tracing::debug!(id, "hn item deleted or untitled; skipping"),
                Err(e) => tracing::warn!(error = ?e, id, "hn item failed; skipping"),
            }
        }
        out
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        self.client
            .get(url)
            .send()
            .await
            .with_context(|| format!("hn http get({url})"))?
            .error_for_status()
            .context("hn non-2xx")?
            .text()
            .await
            .context("hn http .text()")
    }
}

#[async_trait]
impl NewsProvider for HackerNewsProvider {
    async fn fetch_latest(&self) -> Result<Vec<NewsItem>> {
        let ids = Self::parse_top_ids(&self.get_text(&format!("{BASE}/topstories.json")).await?)?;
        let mut bodies = Vec::with_capacity(ids.len());
        for id in ids {
            bodies.push((id, self.get_text(&format!("{BASE}/item/{id}.json")).await));
        }
        Ok(Self::collect_stories(bodies))
    }

    fn name(&self) -> &'static str {
        "HackerNews"
    }
}
