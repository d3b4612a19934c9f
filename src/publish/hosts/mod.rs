// src/publish/hosts/mod.rs
//! Secondary media hosts: take a local file, hand back a public URL.

pub mod dropbox;
pub mod imgur;
pub mod uploadme;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::MediaHostConfig;

pub use dropbox::DropboxHost;
pub use imgur::ImgurHost;
pub use uploadme::UploadMeHost;

#[async_trait::async_trait]
pub trait MediaHost: Send + Sync {
    /// Upload `path` and return a publicly reachable URL for it.
    async fn upload(&self, path: &Path) -> Result<String>;
    fn name(&self) -> &'static str;
}

pub fn build_media_host(cfg: &MediaHostConfig) -> Arc<dyn MediaHost> {
    match cfg {
        MediaHostConfig::Imgur { client_id } => Arc::new(ImgurHost::new(client_id.clone())),
        MediaHostConfig::Dropbox { access_token } => Arc::new(DropboxHost::new(access_token.clone())),
        MediaHostConfig::UploadMe { api_key } => Arc::new(UploadMeHost::new(api_key.clone())),
    }
}

/// Bytes and file name of a media file, for multipart and raw uploads.
pub(crate) async fn read_media(path: &Path) -> Result<(Vec<u8>, String)> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading media file {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "media.png".to_string());
    Ok((bytes, name))
}

/// Fail with the status and a body snippet unless the response is 2xx.
pub(crate) async fn checked_body(resp: reqwest::Response, host: &str) -> Result<String> {
    let status = resp.status();
    let body = resp.text().await.with_context(|| format!("{host}: reading response"))?;
    if !status.is_success() {
        anyhow::bail!("{host} returned HTTP {status}: {}", crate::http::snippet(&body));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_the_configured_host() {
        let h = build_media_host(&MediaHostConfig::Dropbox {
            access_token: "t".into(),
        });
        assert_eq!(h.name(), "dropbox");
        let h = build_media_host(&MediaHostConfig::UploadMe { api_key: "k".into() });
        assert_eq!(h.name(), "uploadme");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let err = read_media(Path::new("/definitely/not/here.png")).await.unwrap_err();
        assert!(err.to_string().contains("reading media file"));
    }
}
