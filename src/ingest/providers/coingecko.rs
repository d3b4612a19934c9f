// src/ingest/providers/coingecko.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::ingest::types::{NewsItem, NewsProvider};
use crate::ingest::MAX_ITEMS_PER_PROVIDER;

const URL: &str = "https://api.coingecko.com/api/v3/search/trending";

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    coins: Vec<Coin>,
}

#[derive(Debug, Deserialize)]
struct Coin {
    item: CoinItem,
}

#[derive(Debug, Deserialize)]
struct CoinItem {
    id: String,
    name: String,
    symbol: String,
    market_cap_rank: Option<u32>,
}

/// Trending coins on CoinGecko, phrased as news items. No key needed.
pub struct CoinGeckoTrendingProvider {
    client: reqwest::Client,
}

impl Default for CoinGeckoTrendingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinGeckoTrendingProvider {
    pub fn new() -> Self {
        Self {
            client: crate::http::build_client(10),
        }
    }

    pub fn parse_payload(s: &str) -> Result<Vec<NewsItem>> {
        let payload: Payload = serde_json::from_str(s).context("parsing coingecko trending json")?;
        let now = Utc::now();
        Ok(payload
            .coins
            .into_iter()
            .take(MAX_ITEMS_PER_PROVIDER)
            .map(|c| {
                let it = c.item;
                let rank = it
                    .market_cap_rank
                    .map(|r| format!("#{r}"))
                    .unwrap_or_else(|| "n/a".to_string());
                NewsItem {
                    title: format!("{} ({}) is trending", it.name, it.symbol),
                    description: format!("Market Cap Rank: {rank}"),
                    url: format!("https://www.coingecko.com/en/coins/{}", it.id),
                    published_at: now,
                    source: "CoinGecko".to_string(),
                }
            })
            .collect())
    }
}

#[async_trait]
impl NewsProvider for CoinGeckoTrendingProvider {
    async fn fetch_latest(&self) -> Result<Vec<NewsItem>> {
        let body = self
            .client
            .get(URL)
            .send()
            .await
            .context("coingecko http get()")?
            .error_for_status()
            .context("coingecko non-2xx")?
            .text()
            .await
            .context("coingecko http .text()")?;
        Self::parse_payload(&body)
    }

    fn name(&self) -> &'static str {
        "CoinGecko"
    }
}
