// src/api.rs
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::compose::PostFormat;
use crate::config::{BotConfig, CredentialOverrides};
use crate::media::ImageKind;
use crate::pipeline::{NewsBot, RunOptions, RunOutcome};
use crate::publish::PublishRoute;

/// Builds a bot for one request's effective config.
pub type BotFactory = Arc<dyn Fn(&BotConfig) -> NewsBot + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    base: Arc<BotConfig>,
    factory: BotFactory,
}

impl AppState {
    pub fn new(base: BotConfig, factory: BotFactory) -> Self {
        Self {
            base: Arc::new(base),
            factory,
        }
    }

    /// State that builds real HTTP-backed bots.
    pub fn live(base: BotConfig) -> Self {
        Self::new(base, Arc::new(NewsBot::from_config))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .route("/run", post(run))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct RunRequest {
    pub credentials: CredentialOverrides,
    pub use_image: bool,
    pub dry_run: bool,
    pub image_generation_type: Option<String>,
    pub crypto_news_enabled: bool,
    pub world_news_enabled: bool,
}

impl Default for RunRequest {
    fn default() -> Self {
        Self {
            credentials: CredentialOverrides::default(),
            use_image: true,
            dry_run: true,
            image_generation_type: None,
            crypto_news_enabled: true,
            world_news_enabled: true,
        }
    }
}

#[derive(Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<PublishRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<PostFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_points: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn detail(status: StatusCode, msg: String) -> Response {
    (status, Json(json!({ "detail": msg }))).into_response()
}

async fn run(State(state): State<AppState>, Json(req): Json<RunRequest>) -> Response {
    let cfg = state.base.with_overrides(&req.credentials);
    if let Err(e) = cfg.validate() {
        tracing::warn!(error = %e, "run request rejected");
        return detail(StatusCode::BAD_REQUEST, e.to_string());
    }

    let image_kind = match req.image_generation_type.as_deref() {
        None => cfg.image_kind,
        Some(raw) => match raw.parse::<ImageKind>() {
            Ok(kind) => kind,
            Err(e) => return detail(StatusCode::BAD_REQUEST, e.to_string()),
        },
    };

    let opts = RunOptions {
        use_image: req.use_image,
        image_kind,
        crypto_news_enabled: req.crypto_news_enabled,
        world_news_enabled: req.world_news_enabled,
        dry_run: req.dry_run,
    };
    tracing::info!(?opts, "run requested over http");

    let bot = (state.factory)(&cfg);
    match bot.run(&opts).await {
        Ok(RunOutcome::NoNews) => Json(RunResponse {
            success: false,
            error: Some("No news items found".to_string()),
            ..Default::default()
        })
        .into_response(),

        Ok(RunOutcome::DryRun {
            text,
            format,
            summary,
            ..
        }) => Json(RunResponse {
            success: true,
            dry_run: Some(true),
            post_text: Some(text),
            format: Some(format),
            headline: Some(summary.headline),
            key_points: Some(summary.key_points),
            ..Default::default()
        })
        .into_response(),

        Ok(RunOutcome::Published {
            result,
            format,
            summary,
        }) => Json(RunResponse {
            success: true,
            dry_run: Some(false),
            post_id: Some(result.post_id),
            post_text: Some(result.final_text),
            media_url: result.media_url,
            route: Some(result.route),
            format: Some(format),
            headline: Some(summary.headline),
            key_points: Some(summary.key_points),
            ..Default::default()
        })
        .into_response(),

        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(RunResponse {
                success: false,
                error: Some(format!("{e:#}")),
                ..Default::default()
            }),
        )
            .into_response(),
    }
}
