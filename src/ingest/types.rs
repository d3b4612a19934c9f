// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub source: String, // e.g. "CoinGecko", "HackerNews"
}

#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<NewsItem>>;
    fn name(&self) -> &'static str;
}
