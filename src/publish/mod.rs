// src/publish/mod.rs
//! Publisher: gets *some* post out whenever the platform's text path works,
//! and attaches media when it can.
//!
//! Chain (each step at most once per run):
//! 1. direct attach on the platform
//! 2. on a tier rejection, a link from the secondary media host
//! 3. text only
//!
//! The media file is owned by a [`ScratchMedia`] guard, so it is removed on
//! every exit path, errors included.

pub mod flow;
pub mod hosts;
pub mod oauth;
pub mod twitter;

use std::path::Path;
use std::sync::Arc;

use metrics::counter;
use serde::Serialize;

use crate::error::PlatformError;
use crate::media::ScratchMedia;
use flow::PublishStep;

pub use hosts::{build_media_host, MediaHost};
pub use twitter::TwitterClient;

/// The social platform the bot posts to.
#[async_trait::async_trait]
pub trait Platform: Send + Sync {
    /// Upload a media file and return the platform's media id.
    async fn upload_media(&self, path: &Path) -> Result<String, PlatformError>;
    /// Create a post and return its id.
    async fn create_post(&self, text: &str, media_ids: &[String]) -> Result<String, PlatformError>;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishRoute {
    WithMedia,
    WithHostedLink,
    TextOnly,
}

impl PublishRoute {
    fn label(self) -> &'static str {
        match self {
            PublishRoute::WithMedia => "with_media",
            PublishRoute::WithHostedLink => "with_hosted_link",
            PublishRoute::TextOnly => "text_only",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishResult {
    pub post_id: String,
    pub final_text: String,
    /// Public URL of the media when it went through the secondary host.
    pub media_url: Option<String>,
    pub route: PublishRoute,
}

pub struct Publisher {
    platform: Arc<dyn Platform>,
    host: Option<Arc<dyn MediaHost>>,
    text_limit: usize,
}

impl Publisher {
    pub fn new(platform: Arc<dyn Platform>, host: Option<Arc<dyn MediaHost>>, text_limit: usize) -> Self {
        Self {
            platform,
            host,
            text_limit,
        }
    }

    pub fn text_limit(&self) -> usize {
        self.text_limit
    }

    /// Publish `body`, with `media` when possible. Only a failure of the final
    /// publish call is returned as an error.
    pub async fn publish(
        &self,
        body: &str,
        media: Option<ScratchMedia>,
    ) -> Result<PublishResult, PlatformError> {
        let mut media = media;
        let media_available = media.as_ref().is_some_and(|m| m.exists());
        if media.is_some() && !media_available {
            tracing::warn!("media file is missing; posting text only");
        }

        let mut step = flow::initial_step(media_available);
        loop {
            tracing::debug!(?step, platform = self.platform.name(), "publish step");
            step = match step {
                PublishStep::DirectAttempt => {
                    let Some(file) = media.as_ref() else {
                        step = PublishStep::TextOnly;
                        continue;
                    };
                    match self.post_with_media(body, file.path()).await {
                        Ok(post_id) => {
                            drop(media.take());
                            return Ok(self.finish(post_id, body.to_string(), None, PublishRoute::WithMedia));
                        }
                        Err(e) => {
                            let next = flow::after_direct_failure(&e, self.host.is_some());
                            if e.is_tier_rejection() {
                                tracing::warn!(error = %e, ?next, "direct media upload rejected for this tier");
                            } else {
                                tracing::error!(error = %e, ?next, "direct media upload failed");
                            }
                            next
                        }
                    }
                }

                PublishStep::SecondaryHostAttempt => {
                    match self.hosted_link(media.take()).await {
                        Some(url) => match flow::fit_text_with_link(body, &url, self.text_limit) {
                            Some(text) => {
                                let post_id = self.platform.create_post(&text, &[]).await?;
                                return Ok(self.finish(post_id, text, Some(url), PublishRoute::WithHostedLink));
                            }
                            None => {
                                tracing::error!(url_len = url.chars().count(), "hosted link does not fit in a post");
                                flow::after_host_failure()
                            }
                        },
                        None => flow::after_host_failure(),
                    }
                }

                PublishStep::TextOnly => {
                    drop(media.take());
                    let post_id = self.platform.create_post(body, &[]).await?;
                    return Ok(self.finish(post_id, body.to_string(), None, PublishRoute::TextOnly));
                }
            };
        }
    }

    async fn post_with_media(&self, body: &str, path: &Path) -> Result<String, PlatformError> {
        let media_id = self.platform.upload_media(path).await?;
        tracing::debug!(%media_id, "media uploaded to platform");
        self.platform.create_post(body, &[media_id]).await
    }

    /// Upload to the secondary host. The media file is gone when this returns.
    async fn hosted_link(&self, media: Option<ScratchMedia>) -> Option<String> {
        let (host, file) = match (self.host.as_ref(), media) {
            (Some(h), Some(f)) => (h, f),
            _ => return None,
        };
        let uploaded = host.upload(file.path()).await;
        drop(file);
        match uploaded {
            Ok(url) => {
                tracing::info!(host = host.name(), %url, "media uploaded to secondary host");
                Some(url)
            }
            Err(e) => {
                tracing::error!(error = ?e, host = host.name(), "secondary host upload failed; posting text only");
                counter!("bot_media_host_errors_total", "host" => host.name()).increment(1);
                None
            }
        }
    }

    fn finish(
        &self,
        post_id: String,
        final_text: String,
        media_url: Option<String>,
        route: PublishRoute,
    ) -> PublishResult {
        counter!("bot_posts_total", "route" => route.label()).increment(1);
        tracing::info!(%post_id, route = route.label(), chars = final_text.chars().count(), "post published");
        PublishResult {
            post_id,
            final_text,
            media_url,
            route,
        }
    }
}
