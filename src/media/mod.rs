// src/media/mod.rs
//! Media generation: turn a summary into an image file in the scratch dir.
//!
//! Every provider failure is logged and swallowed; the caller only ever sees
//! `Some(file)` or `None`.

pub mod chart;
pub mod openai_image;
pub mod scratch;

use anyhow::Result;
use std::str::FromStr;

use crate::ingest::types::NewsItem;
use crate::summarize::Summary;

pub use scratch::ScratchMedia;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    /// Hosted image generation from the summary.
    #[default]
    Ai,
    /// Price chart for the coin the news mentions.
    Chart,
    /// Ai first, chart if that produced nothing.
    Both,
}

impl FromStr for ImageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ai" => Ok(ImageKind::Ai),
            // "screenshot" was the old name for the chart mode
            "chart" | "screenshot" => Ok(ImageKind::Chart),
            "both" => Ok(ImageKind::Both),
            other => anyhow::bail!("unknown image generation type: {other}"),
        }
    }
}

#[async_trait::async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, summary: &Summary, items: &[NewsItem]) -> Result<ScratchMedia>;
    fn name(&self) -> &'static str;
}

/// Picks providers according to the requested [`ImageKind`].
pub struct MediaGenerator {
    ai: Option<Box<dyn ImageProvider>>,
    chart: Option<Box<dyn ImageProvider>>,
}

impl MediaGenerator {
    pub fn new(ai: Option<Box<dyn ImageProvider>>, chart: Option<Box<dyn ImageProvider>>) -> Self {
        Self { ai, chart }
    }

    /// A generator that never produces media.
    pub fn disabled() -> Self {
        Self { ai: None, chart: None }
    }

    pub async fn generate(
        &self,
        kind: ImageKind,
        summary: &Summary,
        items: &[NewsItem],
    ) -> Option<ScratchMedia> {
        let candidates = match kind {
            ImageKind::Ai => [self.ai.as_deref(), None],
            ImageKind::Chart => [self.chart.as_deref(), None],
            ImageKind::Both => [self.ai.as_deref(), self.chart.as_deref()],
        };

        for provider in candidates.into_iter().flatten() {
            match provider.generate(summary, items).await {
                Ok(media) => {
                    tracing::info!(provider = provider.name(), path = %media.path().display(), "media generated");
                    metrics::counter!("bot_media_generated_total", "provider" => provider.name())
                        .increment(1);
                    return Some(media);
                }
                Err(e) => {
                    tracing::warn!(error = ?e, provider = provider.name(), "media generation failed");
                }
            }
        }

        tracing::info!(?kind, "no media for this run");
        None
    }
}
