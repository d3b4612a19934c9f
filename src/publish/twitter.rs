// src/publish/twitter.rs
//! X/Twitter client: v1.1 media upload + v2 post creation, OAuth 1.0a user context.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;

use super::oauth::OAuthSigner;
use super::Platform;
use crate::config::TwitterCredentials;
use crate::error::PlatformError;
use crate::http::snippet;

const UPLOAD_URL: &str = "https://upload.twitter.com/1.1/media/upload.json";
const TWEETS_URL: &str = "https://api.twitter.com/2/tweets";

pub struct TwitterClient {
    http: reqwest::Client,
    signer: OAuthSigner,
}

impl TwitterClient {
    pub fn new(creds: &TwitterCredentials) -> Self {
        Self {
            http: crate::http::build_client(60),
            signer: OAuthSigner::new(creds),
        }
    }
}

#[derive(Deserialize)]
struct UploadResp {
    media_id_string: String,
}

#[derive(Deserialize)]
struct TweetResp {
    data: TweetData,
}

#[derive(Deserialize)]
struct TweetData {
    id: String,
}

pub fn parse_upload_response(body: &str) -> Result<String, PlatformError> {
    serde_json::from_str::<UploadResp>(body)
        .map(|r| r.media_id_string)
        .map_err(|e| PlatformError::Malformed(format!("media upload: {e}")))
}

pub fn parse_tweet_response(body: &str) -> Result<String, PlatformError> {
    serde_json::from_str::<TweetResp>(body)
        .map(|r| r.data.id)
        .map_err(|e| PlatformError::Malformed(format!("create post: {e}")))
}

pub fn tweet_payload(text: &str, media_ids: &[String]) -> serde_json::Value {
    if media_ids.is_empty() {
        json!({ "text": text })
    } else {
        json!({ "text": text, "media": { "media_ids": media_ids } })
    }
}

async fn read_checked(resp: reqwest::Response) -> Result<String, PlatformError> {
    let status = resp.status();
    let body = resp.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(PlatformError::from_status(status.as_u16(), snippet(&body)))
    }
}

#[async_trait::async_trait]
impl Platform for TwitterClient {
    async fn upload_media(&self, path: &Path) -> Result<String, PlatformError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media.png".to_string());
        let form = Form::new().part("media", Part::bytes(bytes).file_name(file_name));

        let auth = self.signer.authorization("POST", UPLOAD_URL, &[])?;
        let resp = self
            .http
            .post(UPLOAD_URL)
            .header(reqwest::header::AUTHORIZATION, auth)
            .multipart(form)
            .send()
            .await?;
        parse_upload_response(&read_checked(resp).await?)
    }

    async fn create_post(&self, text: &str, media_ids: &[String]) -> Result<String, PlatformError> {
        let auth = self.signer.authorization("POST", TWEETS_URL, &[])?;
        let resp = self
            .http
            .post(TWEETS_URL)
            .header(reqwest::header::AUTHORIZATION, auth)
            .json(&tweet_payload(text, media_ids))
            .send()
            .await?;
        parse_tweet_response(&read_checked(resp).await?)
    }

    fn name(&self) -> &'static str {
        "twitter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids() {
        assert_eq!(
            parse_upload_response(r#"{"media_id":1,"media_id_string":"1","size":10}"#).unwrap(),
            "1"
        );
        assert_eq!(
            parse_tweet_response(r#"{"data":{"id":"1445880548472328192","text":"hi"}}"#).unwrap(),
            "1445880548472328192"
        );
        assert!(matches!(
            parse_tweet_response(r#"{"errors":[]}"#),
            Err(PlatformError::Malformed(_))
        ));
    }

    #[test]
    fn payload_omits_empty_media() {
        assert_eq!(tweet_payload("t", &[]), json!({"text": "t"}));
        assert_eq!(
            tweet_payload("t", &["9".to_string()]),
            json!({"text": "t", "media": {"media_ids": ["9"]}})
        );
    }
}
