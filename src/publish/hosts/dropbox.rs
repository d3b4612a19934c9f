// src/publish/hosts/dropbox.rs
//! Dropbox: upload into the app folder, then create a shared link and turn
//! it into a direct (raw) one.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;

use super::{checked_body, read_media, MediaHost};

const UPLOAD_URL: &str = "https://content.dropboxapi.com/2/files/upload";
const SHARE_URL: &str = "https://api.dropboxapi.com/2/sharing/create_shared_link_with_settings";
const FOLDER: &str = "/news_bot";

pub struct DropboxHost {
    http: reqwest::Client,
    access_token: String,
}

impl DropboxHost {
    pub fn new(access_token: String) -> Self {
        Self {
            http: crate::http::build_client(60),
            access_token,
        }
    }
}

#[derive(Deserialize)]
struct UploadResp {
    path_display: Option<String>,
}

#[derive(Deserialize)]
struct ShareResp {
    url: String,
}

/// Shared links open a preview page; `raw=1` serves the file itself.
pub fn direct_link(shared: &str) -> String {
    if shared.contains("dl=0") {
        shared.replace("dl=0", "raw=1")
    } else if shared.contains('?') {
        format!("{shared}&raw=1")
    } else {
        format!("{shared}?raw=1")
    }
}

#[async_trait::async_trait]
impl MediaHost for DropboxHost {
    async fn upload(&self, path: &Path) -> Result<String> {
        let (bytes, name) = read_media(path).await?;
        let target = format!("{FOLDER}/{name}");
        let arg = json!({ "path": target, "mode": "add", "autorename": true });

        let resp = self
            .http
            .post(UPLOAD_URL)
            .bearer_auth(&self.access_token)
            .header("Dropbox-API-Arg", arg.to_string())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .context("dropbox: upload request")?;
        let body = checked_body(resp, "dropbox upload").await?;
        let uploaded: UploadResp = serde_json::from_str(&body).context("dropbox: decoding upload")?;
        // autorename may have picked a different name
        let stored = uploaded.path_display.unwrap_or(target);

        let resp = self
            .http
            .post(SHARE_URL)
            .bearer_auth(&self.access_token)
            .json(&json!({ "path": stored }))
            .send()
            .await
            .context("dropbox: share request")?;
        let body = checked_body(resp, "dropbox share").await?;
        let shared: ShareResp = serde_json::from_str(&body).context("dropbox: decoding share")?;
        Ok(direct_link(&shared.url))
    }

    fn name(&self) -> &'static str {
        "dropbox"
    }
}
