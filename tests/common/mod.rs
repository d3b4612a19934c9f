// tests/common/mod.rs
//
// In-process fakes for the bot's seams: news providers, platform, media host,
// image provider. Each integration test file pulls in what it needs.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;

use news_tweet_bot::error::PlatformError;
use news_tweet_bot::ingest::types::{NewsItem, NewsProvider};
use news_tweet_bot::ingest::FallbackSource;
use news_tweet_bot::media::{ImageProvider, ScratchMedia};
use news_tweet_bot::publish::{MediaHost, Platform};
use news_tweet_bot::summarize::Summary;

pub fn item(title: &str, source: &str) -> NewsItem {
    NewsItem {
        title: title.to_string(),
        description: format!("{title} details"),
        url: format!("https://news.example/{}", title.len()),
        published_at: Utc::now(),
        source: source.to_string(),
    }
}

// ---------- news ----------

pub struct StaticProvider(pub Vec<NewsItem>);

#[async_trait::async_trait]
impl NewsProvider for StaticProvider {
    async fn fetch_latest(&self) -> Result<Vec<NewsItem>> {
        Ok(self.0.clone())
    }
    fn name(&self) -> &'static str {
        "static"
    }
}

pub struct DownProvider;

#[async_trait::async_trait]
impl NewsProvider for DownProvider {
    async fn fetch_latest(&self) -> Result<Vec<NewsItem>> {
        anyhow::bail!("provider unavailable")
    }
    fn name(&self) -> &'static str {
        "down"
    }
}

pub fn source_with(label: &'static str, items: Vec<NewsItem>) -> FallbackSource {
    FallbackSource::new(label, Box::new(DownProvider), Box::new(StaticProvider(items)))
}

pub fn empty_source(label: &'static str) -> FallbackSource {
    FallbackSource::new(label, Box::new(DownProvider), Box::new(DownProvider))
}

// ---------- platform ----------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upload {
    Ok,
    TierRejected,
    ServerError,
}

pub struct FakePlatform {
    upload: Upload,
    fail_posts: bool,
    pub uploads: AtomicUsize,
    pub posts: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakePlatform {
    pub fn new(upload: Upload) -> Self {
        Self {
            upload,
            fail_posts: false,
            uploads: AtomicUsize::new(0),
            posts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_posts(upload: Upload) -> Self {
        Self {
            fail_posts: true,
            ..Self::new(upload)
        }
    }

    pub fn posts(&self) -> Vec<(String, Vec<String>)> {
        self.posts.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Platform for FakePlatform {
    async fn upload_media(&self, path: &Path) -> Result<String, PlatformError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        assert!(path.is_file(), "media must exist when uploaded");
        match self.upload {
            Upload::Ok => Ok("media-1".to_string()),
            Upload::TierRejected => Err(PlatformError::from_status(
                403,
                r#"{"title":"Forbidden","detail":"You currently have access to a subset of endpoints"}"#.into(),
            )),
            Upload::ServerError => Err(PlatformError::from_status(500, "internal error".into())),
        }
    }

    async fn create_post(&self, text: &str, media_ids: &[String]) -> Result<String, PlatformError> {
        if self.fail_posts {
            return Err(PlatformError::from_status(503, "service unavailable".into()));
        }
        let mut posts = self.posts.lock().unwrap();
        posts.push((text.to_string(), media_ids.to_vec()));
        Ok(format!("post-{}", posts.len()))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

// ---------- secondary host ----------

pub struct FakeHost {
    url: Option<String>,
    pub calls: AtomicUsize,
}

impl FakeHost {
    pub fn returning(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            url: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MediaHost for FakeHost {
    async fn upload(&self, path: &Path) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(path.is_file(), "media must exist when handed to the host");
        match &self.url {
            Some(u) => Ok(u.clone()),
            None => anyhow::bail!("host returned HTTP 500"),
        }
    }

    fn name(&self) -> &'static str {
        "fake-host"
    }
}

// ---------- media ----------

/// Writes a small PNG-ish file into `dir` and remembers the last path.
pub struct FileImages {
    pub dir: PathBuf,
    pub last: Arc<Mutex<Option<PathBuf>>>,
}

impl FileImages {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            last: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait::async_trait]
impl ImageProvider for FileImages {
    async fn generate(&self, _summary: &Summary, _items: &[NewsItem]) -> Result<ScratchMedia> {
        let media = ScratchMedia::create(&self.dir, "test", "png", b"\x89PNG fake")?;
        *self.last.lock().unwrap() = Some(media.path().to_path_buf());
        Ok(media)
    }

    fn name(&self) -> &'static str {
        "files"
    }
}

pub fn scratch(dir: &Path) -> ScratchMedia {
    ScratchMedia::create(dir, "test", "png", b"\x89PNG fake").expect("create scratch media")
}
