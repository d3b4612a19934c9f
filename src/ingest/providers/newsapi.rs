// src/ingest/providers/newsapi.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::parse_rfc3339_or_now;
use crate::ingest::types::{NewsItem, NewsProvider};
use crate::ingest::MAX_ITEMS_PER_PROVIDER;

const URL: &str = "https://newsapi.org/v2/top-headlines";

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    source: Option<ArticleSource>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

/// Technology top headlines from NewsAPI. Needs an API key.
pub struct NewsApiProvider {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl NewsApiProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: crate::http::build_client(10),
        }
    }

    pub fn parse_payload(s: &str) -> Result<Vec<NewsItem>> {
        let payload: Payload = serde_json::from_str(s).context("parsing newsapi json")?;
        Ok(payload
            .articles
            .into_iter()
            .filter_map(|a| {
                let title = a.title.filter(|t| !t.trim().is_empty())?;
                Some(NewsItem {
                    description: a
                        .description
                        .filter(|d| !d.trim().is_empty())
                        .unwrap_or_else(|| title.clone()),
                    url: a.url.unwrap_or_default(),
                    published_at: parse_rfc3339_or_now(a.published_at.as_deref()),
                    source: a
                        .source
                        .and_then(|s| s.name)
                        .unwrap_or_else(|| "News".to_string()),
                    title,
                })
            })
            .take(MAX_ITEMS_PER_PROVIDER)
            .collect())
    }
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    async fn fetch_latest(&self) -> Result<Vec<NewsItem>> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("NEWS_API_KEY is not set"))?;
        let page_size = MAX_ITEMS_PER_PROVIDER.to_string();
        let body = self
            .client
            .get(URL)
            .query(&[
                ("apiKey", key),
                ("category", "technology"),
                ("language", "en"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .context("newsapi http get()")?
            .error_for_status()
            .context("newsapi non-2xx")?
            .text()
            .await
            .context("newsapi http .text()")?;
        Self::parse_payload(&body)
    }

    fn name(&self) -> &'static str {
        "NewsAPI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_get_defaults() {
        let json = r#"{"status":"ok","articles":[
            {"title":"Chip maker beats estimates","description":null,"url":"https://n.example/a",
             "publishedAt":"2025-03-01T10:00:00Z","source":{"id":null,"name":"Reuters"}},
            {"title":null,"description":"dropped"},
            {"title":"Open model released","url":"https://n.example/b","source":{}}
        ]}"#;
        let items = NewsApiProvider::parse_payload(json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "Chip maker beats estimates");
        assert_eq!(items[0].source, "Reuters");
        assert_eq!(items[1].source, "News");
    }
}
