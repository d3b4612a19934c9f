// src/publish/hosts/imgur.rs
use std::path::Path;

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{checked_body, read_media, MediaHost};

const UPLOAD_URL: &str = "https://api.imgur.com/3/image";

/// Anonymous Imgur upload (client id auth).
pub struct ImgurHost {
    http: reqwest::Client,
    client_id: String,
}

impl ImgurHost {
    pub fn new(client_id: String) -> Self {
        Self {
            http: crate::http::build_client(60),
            client_id,
        }
    }
}

#[derive(Deserialize)]
struct Resp {
    data: Data,
}

#[derive(Deserialize)]
struct Data {
    link: Option<String>,
}

pub fn parse_link(body: &str) -> Result<String> {
    let resp: Resp = serde_json::from_str(body).context("imgur: decoding response")?;
    resp.data
        .link
        .filter(|l| !l.is_empty())
        .context("imgur: response has no link")
}

#[async_trait::async_trait]
impl MediaHost for ImgurHost {
    async fn upload(&self, path: &Path) -> Result<String> {
        let (bytes, name) = read_media(path).await?;
        let form = Form::new().part("image", Part::bytes(bytes).file_name(name));
        let resp = self
            .http
            .post(UPLOAD_URL)
            .header(reqwest::header::AUTHORIZATION, format!("Client-ID {}", self.client_id))
            .multipart(form)
            .send()
            .await
            .context("imgur: upload request")?;
        parse_link(&checked_body(resp, "imgur").await?)
    }

    fn name(&self) -> &'static str {
        "imgur"
    }
}
