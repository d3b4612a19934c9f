// src/media/openai_image.rs
use anyhow::{anyhow, Context, Result};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{ImageProvider, ScratchMedia};
use crate::compose::extract_hashtags;
use crate::ingest::types::NewsItem;
use crate::summarize::Summary;

const IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";

/// Hosted image generation through the OpenAI images API.
pub struct OpenAiImageProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    scratch_dir: PathBuf,
}

impl OpenAiImageProvider {
    pub fn new(api_key: String, model: String, scratch_dir: PathBuf) -> Self {
        Self {
            http: crate::http::build_client(90),
            api_key,
            model,
            scratch_dir,
        }
    }
}

/// Prompt for a 16:9 news card with no text in the picture.
pub fn build_image_prompt(summary: &Summary) -> String {
    let mut prompt = format!(
        "Editorial illustration for a crypto and tech news post. Topic: {}.",
        summary.headline
    );
    if !summary.key_points.is_empty() {
        prompt.push_str(" Context: ");
        prompt.push_str(&summary.key_points.join("; "));
        prompt.push('.');
    }
    prompt.push_str(&format!(
        " Mood keywords: {}. Dark background, bold modern style, no text, no logos, no faces.",
        extract_hashtags(summary).replace('#', "")
    ));
    prompt
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct Resp {
    data: Vec<Datum>,
}

#[derive(Deserialize)]
struct Datum {
    b64_json: Option<String>,
}

#[async_trait::async_trait]
impl ImageProvider for OpenAiImageProvider {
    async fn generate(&self, summary: &Summary, _items: &[NewsItem]) -> Result<ScratchMedia> {
        if self.api_key.is_empty() {
            return Err(anyhow!("OPENAI_API_KEY is not set"));
        }
        let prompt = build_image_prompt(summary);
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "requesting image");

        let resp = self
            .http
            .post(IMAGES_URL)
            .bearer_auth(&self.api_key)
            .json(&Req {
                model: &self.model,
                prompt: &prompt,
                n: 1,
                size: "1792x1024",
                response_format: "b64_json",
            })
            .send()
            .await
            .context("openai images request")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "openai images HTTP {status}: {}",
                crate::http::snippet(&body)
            ));
        }

        let body: Resp = resp.json().await.context("decoding openai images response")?;
        let b64 = body
            .data
            .into_iter()
            .find_map(|d| d.b64_json)
            .ok_or_else(|| anyhow!("openai images response had no image data"))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(b64.trim())
            .context("decoding base64 image")?;

        ScratchMedia::create(&self.scratch_dir, "news_ai", "png", &bytes)
            .context("writing generated image")
    }

    fn name(&self) -> &'static str {
        "openai-image"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_mentions_headline_points_and_tags() {
        let s = Summary {
            headline: "Bitcoin tops 100k".into(),
            key_points: vec!["ETF inflows surge".into(), "Miners hold".into()],
        };
        let p = build_image_prompt(&s);
        assert!(p.contains("Bitcoin tops 100k"));
        assert!(p.contains("ETF inflows surge; Miners hold"));
        assert!(p.contains("Bitcoin"));
        assert!(!p.contains('#'));
    }
}
