// src/ingest/providers/cryptopanic.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::parse_rfc3339_or_now;
use crate::ingest::types::{NewsItem, NewsProvider};
use crate::ingest::MAX_ITEMS_PER_PROVIDER;

const URL: &str = "https://cryptopanic.com/api/v1/posts/";

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    results: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    title: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    source: Option<PostSource>,
}

#[derive(Debug, Deserialize)]
struct PostSource {
    title: Option<String>,
}

/// Important crypto news from CryptoPanic. Needs an auth token.
pub struct CryptoPanicProvider {
    token: Option<String>,
    client: reqwest::Client,
}

impl CryptoPanicProvider {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token,
            client: crate::http::build_client(10),
        }
    }

    pub fn parse_payload(s: &str) -> Result<Vec<NewsItem>> {
        let payload: Payload = serde_json::from_str(s).context("parsing cryptopanic json")?;
        Ok(payload
            .results
            .into_iter()
            .filter_map(|p| {
                let title = p.title.filter(|t| !t.trim().is_empty())?;
                Some(NewsItem {
                    description: title.clone(),
                    url: p.url.unwrap_or_default(),
                    published_at: parse_rfc3339_or_now(p.published_at.as_deref()),
                    source: p
                        .source
                        .and_then(|s| s.title)
                        .unwrap_or_else(|| "CryptoPanic".to_string()),
                    title,
                })
            })
            .take(MAX_ITEMS_PER_PROVIDER)
            .collect())
    }
}

#[async_trait]
impl NewsProvider for CryptoPanicProvider {
    async fn fetch_latest(&self) -> Result<Vec<NewsItem>> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| anyhow!("CRYPTOPANIC_API_TOKEN is not set"))?;
        let body = self
            .client
            .get(URL)
            .query(&[("auth_token", token), ("kind", "news"), ("filter", "important")])
            .send()
            .await
            .context("cryptopanic http get()")?
            .error_for_status()
            .context("cryptopanic non-2xx")?
            .text()
            .await
            .context("cryptopanic http .text()")?;
        Self::parse_payload(&body)
    }

    fn name(&self) -> &'static str {
        "CryptoPanic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_posts_and_caps_at_five() {
        let posts: Vec<String> = (0..7)
            .map(|i| {
                format!(
                    r#"{{"title":"Post {i}","url":"https://cp.example/{i}","published_at":"2025-01-02T03:04:05Z","source":{{"title":"CoinDesk"}}}}"#
                )
            })
            .collect();
        let json = format!(r#"{{"results":[{}]}}"#, posts.join(","));
        let items = CryptoPanicProvider::parse_payload(&json).unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].title, "Post 0");
        assert_eq!(items[0].description, "Post 0");
        assert_eq!(items[0].source, "CoinDesk");
        assert_eq!(items[0].published_at.to_rfc3339(), "2025-01-02T03:04:05+00:00");
    }

    #[test]
    fn untitled_posts_are_skipped_not_fatal() {
        let json = r#"{"results":[
            {"url":"https://cp.example/0"},
            {"title":null,"url":"https://cp.example/1"},
            {"title":"  ","url":"https://cp.example/2"},
            {"title":"Kept","url":"https://cp.example/3"}
        ]}"#;
        let items = CryptoPanicProvider::parse_payload(json).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Kept");
        assert_eq!(items[0].source, "CryptoPanic");
    }

    #[tokio::test]
    async fn missing_token_is_an_error() {
        let p = CryptoPanicProvider::new(None);
        assert!(p.fetch_latest().await.is_err());
    }
}
