//! news-tweet-bot entrypoint.
//!
//! Three modes: one run (`--once`), a run every N minutes (default), or the
//! HTTP API (`--serve`). See `README.md` for the environment it reads.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use news_tweet_bot::api::{self, AppState};
use news_tweet_bot::cli::Cli;
use news_tweet_bot::config::{file::load_toggles_default, BotConfig};
use news_tweet_bot::metrics::Metrics;
use news_tweet_bot::pipeline::{NewsBot, RunOptions, RunOutcome};
use news_tweet_bot::scheduler::spawn_scheduler;

/// `RUST_LOG` filter (default `info`); `LOG_FORMAT=json` for JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::NoNews => tracing::info!("nothing to post"),
        RunOutcome::DryRun { text, format, .. } => {
            tracing::info!(?format, "dry run preview:\n{text}");
        }
        RunOutcome::Published { result, .. } => {
            tracing::info!(post_id = %result.post_id, route = ?result.route, "posted");
        }
    }
}

async fn serve(cfg: BotConfig, port: u16) -> anyhow::Result<()> {
    if let Err(e) = cfg.validate() {
        // requests may still carry their own credentials
        tracing::warn!(error = %e, "starting without full credentials");
    }

    let metrics = Metrics::init()?;
    let app = api::router(AppState::live(cfg)).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding port {port}"))?;
    tracing::info!(port, "http api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .context("http server")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let toggles = load_toggles_default()?;
    let mut cfg = BotConfig::from_env(&toggles).context("reading configuration")?;
    if let Some(minutes) = cli.interval_minutes {
        cfg.interval_minutes = minutes;
    }
    if let Some(kind) = cli.image_kind {
        cfg.image_kind = kind;
    }
    if cli.video {
        tracing::warn!("video attachments are not supported; ignoring --video");
    }

    if cli.serve {
        return serve(cfg, cli.port).await;
    }

    cfg.validate().context("startup credentials check")?;
    let period = cfg.schedule_period()?;
    tracing::info!(
        crypto = cfg.crypto_news_enabled,
        world = cfg.world_news_enabled,
        image = cli.image,
        image_kind = ?cfg.image_kind,
        dry_run = cli.dry_run,
        "bot configured"
    );

    let bot = Arc::new(NewsBot::from_config(&cfg));
    let opts = RunOptions {
        use_image: cli.image,
        dry_run: cli.dry_run,
        ..RunOptions::from_config(&cfg)
    };

    if cli.once {
        let outcome = bot.run(&opts).await?;
        report(&outcome);
        return Ok(());
    }

    tracing::info!(minutes = cfg.interval_minutes, "scheduled mode");
    let scheduler = spawn_scheduler(period, move || {
        let bot = bot.clone();
        async move {
            // failures are logged inside run(); the next tick retries
            if let Ok(outcome) = bot.run(&opts).await {
                report(&outcome);
            }
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
        res = scheduler => {
            if let Err(e) = res {
                tracing::error!(error = %e, "scheduler stopped");
            }
        }
    }
    Ok(())
}
