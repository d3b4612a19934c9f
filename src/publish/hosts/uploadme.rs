// src/publish/hosts/uploadme.rs
use std::path::Path;

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::{checked_body, read_media, MediaHost};

const UPLOAD_URL: &str = "https://uploadme.me/api/1/upload";

pub struct UploadMeHost {
    http: reqwest::Client,
    api_key: String,
}

impl UploadMeHost {
    pub fn new(api_key: String) -> Self {
        Self {
            http: crate::http::build_client(60),
            api_key,
        }
    }
}

/// The URL sits at `image.url` on current responses and at top-level `URL` on older ones.
pub fn parse_url(body: &str) -> Result<String> {
    let v: Value = serde_json::from_str(body).context("uploadme: decoding response")?;
    v.pointer("/image/url")
        .or_else(|| v.get("URL"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .context("uploadme: response has no url")
}

#[async_trait::async_trait]
impl MediaHost for UploadMeHost {
    async fn upload(&self, path: &Path) -> Result<String> {
        let (bytes, name) = read_media(path).await?;
        let form = Form::new()
            .text("key", self.api_key.clone())
            .text("format", "json")
            .part("source", Part::bytes(bytes).file_name(name));
        let resp = self
            .http
            .post(UPLOAD_URL)
            .multipart(form)
            .send()
            .await
            .context("uploadme: upload request")?;
        parse_url(&checked_body(resp, "uploadme").await?)
    }

    fn name(&self) -> &'static str {
        "uploadme"
    }
}
