// src/media/chart.rs
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

use super::{ImageProvider, ScratchMedia};
use crate::ingest::types::NewsItem;
use crate::summarize::Summary;

/// Tickers we look for in news text, in priority order, with their CoinGecko ids.
pub const SYMBOLS: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("SOL", "solana"),
    ("XRP", "ripple"),
    ("ADA", "cardano"),
    ("DOT", "polkadot"),
    ("MATIC", "matic-network"),
    ("LINK", "chainlink"),
    ("UNI", "uniswap"),
    ("AVAX", "avalanche-2"),
];

// Anything smaller is an error page or an empty placeholder.
const MIN_IMAGE_BYTES: usize = 1000;

/// Downloads the CoinGecko sparkline for the coin the news talks about.
pub struct CoinGeckoChartProvider {
    http: reqwest::Client,
    scratch_dir: PathBuf,
}

impl CoinGeckoChartProvider {
    pub fn new(scratch_dir: PathBuf) -> Self {
        Self {
            http: crate::http::build_client(15),
            scratch_dir,
        }
    }
}

/// First item that mentions a known ticker decides; BTC otherwise.
pub fn detect_symbol(items: &[NewsItem]) -> &'static str {
    for item in items {
        let combined = format!("{} {}", item.title, item.description).to_uppercase();
        let words: Vec<&str> = combined
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        if let Some((sym, _)) = SYMBOLS
            .iter()
            .find(|(sym, id)| words.contains(sym) || words.contains(&id.to_uppercase().as_str()))
        {
            return *sym;
        }
    }
    "BTC"
}

pub fn coingecko_id(symbol: &str) -> &'static str {
    SYMBOLS
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
        .map(|(_, id)| *id)
        .unwrap_or("bitcoin")
}

#[async_trait::async_trait]
impl ImageProvider for CoinGeckoChartProvider {
    async fn generate(&self, _summary: &Summary, items: &[NewsItem]) -> Result<ScratchMedia> {
        let symbol = detect_symbol(items);
        let url = format!(
            "https://www.coingecko.com/coins/{}/sparkline.png",
            coingecko_id(symbol)
        );
        tracing::debug!(%symbol, %url, "downloading chart");

        let resp = self
            .http
            .get(&url)
            .header("Accept", "image/png,image/*;q=0.8")
            .header("Referer", "https://www.coingecko.com/")
            .send()
            .await
            .context("chart download")?;
        let status = resp.status();
        let bytes = resp.bytes().await.context("chart body")?;
        if !status.is_success() || bytes.len() < MIN_IMAGE_BYTES {
            return Err(anyhow!(
                "chart download failed: status {status}, {} bytes",
                bytes.len()
            ));
        }

        ScratchMedia::create(&self.scratch_dir, &format!("chart_{symbol}"), "png", &bytes)
            .context("writing chart image")
    }

    fn name(&self) -> &'static str {
        "coingecko-chart"
    }
}
