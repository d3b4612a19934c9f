// src/pipeline.rs
//! One run: fetch → summarize → compose → media → publish.

use std::sync::Arc;

use anyhow::Context;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

use crate::compose::{compose_post, PostFormat};
use crate::config::BotConfig;
use crate::ingest::providers::coingecko::CoinGeckoTrendingProvider;
use crate::ingest::providers::cryptopanic::CryptoPanicProvider;
use crate::ingest::providers::hackernews::HackerNewsProvider;
use crate::ingest::providers::newsapi::NewsApiProvider;
use crate::ingest::{collect_news, FallbackSource};
use crate::media::chart::CoinGeckoChartProvider;
use crate::media::openai_image::OpenAiImageProvider;
use crate::media::{ImageKind, MediaGenerator};
use crate::publish::{build_media_host, PublishResult, Publisher, TwitterClient};
use crate::summarize::{summarize, DynSummaryProvider, OpenAiSummarizer, Summary};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("bot_runs_total", "Runs started.");
        describe_counter!("bot_run_failures_total", "Runs that ended in an error.");
        describe_counter!("bot_posts_total", "Posts published, by route.");
    });
}

/// Per-run switches. The CLI and HTTP API fill these differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub use_image: bool,
    pub image_kind: ImageKind,
    pub crypto_news_enabled: bool,
    pub world_news_enabled: bool,
    pub dry_run: bool,
}

impl RunOptions {
    pub fn from_config(cfg: &BotConfig) -> Self {
        Self {
            use_image: false,
            image_kind: cfg.image_kind,
            crypto_news_enabled: cfg.crypto_news_enabled,
            world_news_enabled: cfg.world_news_enabled,
            dry_run: false,
        }
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    /// Every enabled source came back empty; nothing was published.
    NoNews,
    DryRun {
        text: String,
        format: PostFormat,
        summary: Summary,
        media_generated: bool,
    },
    Published {
        result: PublishResult,
        format: PostFormat,
        summary: Summary,
    },
}

pub struct NewsBot {
    crypto: Option<FallbackSource>,
    world: Option<FallbackSource>,
    summarizer: DynSummaryProvider,
    media: MediaGenerator,
    publisher: Publisher,
}

impl NewsBot {
    pub fn new(
        crypto: Option<FallbackSource>,
        world: Option<FallbackSource>,
        summarizer: DynSummaryProvider,
        media: MediaGenerator,
        publisher: Publisher,
    ) -> Self {
        Self {
            crypto,
            world,
            summarizer,
            media,
            publisher,
        }
    }

    /// Wire the real HTTP-backed components.
    pub fn from_config(cfg: &BotConfig) -> Self {
        let crypto = FallbackSource::new(
            "crypto",
            Box::new(CryptoPanicProvider::new(cfg.cryptopanic_token.clone())),
            Box::new(CoinGeckoTrendingProvider::new()),
        );
        let world = FallbackSource::new(
            "world",
            Box::new(NewsApiProvider::new(cfg.news_api_key.clone())),
            Box::new(HackerNewsProvider::new()),
        );

        let summarizer: DynSummaryProvider = Arc::new(OpenAiSummarizer::new(
            cfg.openai_api_key.clone(),
            cfg.openai_model.clone(),
        ));

        let media = MediaGenerator::new(
            Some(Box::new(OpenAiImageProvider::new(
                cfg.openai_api_key.clone(),
                cfg.openai_image_model.clone(),
                cfg.scratch_dir.clone(),
            ))),
            Some(Box::new(CoinGeckoChartProvider::new(cfg.scratch_dir.clone()))),
        );

        let host = cfg.media_host().map(|h| {
            tracing::info!(host = ?h.kind(), "secondary media host configured");
            build_media_host(&h)
        });
        let publisher = Publisher::new(Arc::new(TwitterClient::new(&cfg.twitter)), host, cfg.text_limit);

        Self::new(Some(crypto), Some(world), summarizer, media, publisher)
    }

    pub async fn run(&self, opts: &RunOptions) -> anyhow::Result<RunOutcome> {
        ensure_metrics_described();
        counter!("bot_runs_total").increment(1);

        let started = std::time::Instant::now();
        let outcome = self.run_inner(opts).await;
        match &outcome {
            Ok(o) => tracing::info!(outcome = o.label(), elapsed_ms = started.elapsed().as_millis() as u64, "run finished"),
            Err(e) => {
                counter!("bot_run_failures_total").increment(1);
                tracing::error!(error = ?e, "run failed");
            }
        }
        outcome
    }

    async fn run_inner(&self, opts: &RunOptions) -> anyhow::Result<RunOutcome> {
        let mut sources: Vec<&FallbackSource> = Vec::new();
        if opts.crypto_news_enabled {
            sources.extend(self.crypto.as_ref());
        }
        if opts.world_news_enabled {
            sources.extend(self.world.as_ref());
        }

        let items = collect_news(&sources).await;
        if items.is_empty() {
            tracing::warn!("no news items found; skipping this run");
            return Ok(RunOutcome::NoNews);
        }

        let summary = summarize(self.summarizer.as_ref(), &items).await;
        let (text, format) = compose_post(&summary, self.publisher.text_limit());
        tracing::info!(?format, chars = text.chars().count(), headline = %summary.headline, "post composed");

        let media = if opts.use_image {
            self.media.generate(opts.image_kind, &summary, &items).await
        } else {
            None
        };

        if opts.dry_run {
            let media_generated = media.is_some();
            drop(media);
            tracing::info!(text = %text, media_generated, "dry run; not publishing");
            return Ok(RunOutcome::DryRun {
                text,
                format,
                summary,
                media_generated,
            });
        }

        let result = self
            .publisher
            .publish(&text, media)
            .await
            .context("publishing post")?;
        Ok(RunOutcome::Published {
            result,
            format,
            summary,
        })
    }
}

impl RunOutcome {
    fn label(&self) -> &'static str {
        match self {
            RunOutcome::NoNews => "no_news",
            RunOutcome::DryRun { .. } => "dry_run",
            RunOutcome::Published { .. } => "published",
        }
    }
}
