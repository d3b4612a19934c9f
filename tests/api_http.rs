// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /run (missing credentials, inline credentials, no news, dry run,
//   publish, publish failure)

mod common;

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use common::{empty_source, item, source_with, FakePlatform, Upload};
use news_tweet_bot::api::{self, AppState};
use news_tweet_bot::config::{BotConfig, TwitterCredentials};
use news_tweet_bot::media::MediaGenerator;
use news_tweet_bot::pipeline::NewsBot;
use news_tweet_bot::publish::Publisher;
use news_tweet_bot::summarize::FixedSummarizer;

const BODY_LIMIT: usize = 1024 * 1024;

fn full_config() -> BotConfig {
    BotConfig {
        twitter: TwitterCredentials {
            api_key: "k".into(),
            api_secret: "s".into(),
            access_token: "t".into(),
            access_secret: "ts".into(),
        },
        openai_api_key: "sk-test".into(),
        ..BotConfig::default()
    }
}

/// Router whose bots read from fakes; `with_news` controls whether any items exist.
fn test_router(base: BotConfig, with_news: bool, platform: Arc<FakePlatform>) -> Router {
    let factory = move |_cfg: &BotConfig| {
        let crypto = if with_news {
            source_with("crypto", vec![item("BTC jumps", "CoinGecko")])
        } else {
            empty_source("crypto")
        };
        NewsBot::new(
            Some(crypto),
            Some(empty_source("world")),
            Arc::new(FixedSummarizer {
                fixed: "HEADLINE: Bitcoin jumps\n• Inflows up".into(),
            }),
            MediaGenerator::disabled(),
            Publisher::new(platform.clone(), None, 280),
        )
    };
    api::router(AppState::new(base, Arc::new(factory)))
}

async fn post_run(app: Router, payload: Json) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("POST")
        .uri("/run")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /run");
    let resp = app.oneshot(req).await.expect("oneshot /run");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn api_health_returns_ok_status() {
    let app = test_router(full_config(), true, Arc::new(FakePlatform::new(Upload::Ok)));
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let v: Json = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v, json!({"status": "ok"}));
}

#[tokio::test]
async fn api_run_without_credentials_is_400() {
    let app = test_router(BotConfig::default(), true, Arc::new(FakePlatform::new(Upload::Ok)));
    let (status, v) = post_run(app, json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = v["detail"].as_str().unwrap();
    assert!(detail.starts_with("Missing credentials:"), "{detail}");
    assert!(detail.contains("twitter_api_key"));
    assert!(detail.contains("openai_api_key"));
}

#[tokio::test]
async fn api_run_accepts_inline_credentials() {
    let app = test_router(BotConfig::default(), true, Arc::new(FakePlatform::new(Upload::Ok)));
    let payload = json!({
        "credentials": {
            "twitterApiKey": "k",
            "twitterApiSecret": "s",
            "twitterAccessToken": "t",
            "twitterAccessSecret": "ts",
            "openaiApiKey": "sk"
        }
    });
    let (status, v) = post_run(app, payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["success"], true);
}

#[tokio::test]
async fn api_run_defaults_to_dry_run() {
    let platform = Arc::new(FakePlatform::new(Upload::Ok));
    let app = test_router(full_config(), true, platform.clone());
    let (status, v) = post_run(app, json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["success"], true);
    assert_eq!(v["dryRun"], true);
    assert_eq!(v["headline"], "Bitcoin jumps");
    assert_eq!(v["keyPoints"], json!(["Inflows up"]));
    assert_eq!(v["format"], "full");
    assert!(v.get("postId").is_none());
    assert!(platform.posts().is_empty());
}

#[tokio::test]
async fn api_run_publishes_when_not_dry() {
    let platform = Arc::new(FakePlatform::new(Upload::Ok));
    let app = test_router(full_config(), true, platform.clone());
    let (status, v) = post_run(app, json!({"dryRun": false, "useImage": false})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["success"], true);
    assert_eq!(v["dryRun"], false);
    assert_eq!(v["postId"], "post-1");
    assert_eq!(v["route"], "text_only");
    assert_eq!(v["postText"], "📰 Bitcoin jumps\n\n▸ Inflows up");
    assert_eq!(platform.posts().len(), 1);
}

#[tokio::test]
async fn api_run_without_news_reports_failure_body() {
    let platform = Arc::new(FakePlatform::new(Upload::Ok));
    let app = test_router(full_config(), false, platform.clone());
    let (status, v) = post_run(app, json!({"dryRun": false})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["success"], false);
    assert_eq!(v["error"], "No news items found");
    assert!(platform.posts().is_empty());
}

#[tokio::test]
async fn api_run_publish_failure_is_502() {
    let platform = Arc::new(FakePlatform::failing_posts(Upload::Ok));
    let app = test_router(full_config(), true, platform);
    let (status, v) = post_run(app, json!({"dryRun": false})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(v["success"], false);
    assert!(v["error"].as_str().unwrap().contains("publishing post"));
}

#[tokio::test]
async fn api_run_rejects_unknown_image_type() {
    let app = test_router(full_config(), true, Arc::new(FakePlatform::new(Upload::Ok)));
    let (status, _) = post_run(app, json!({"imageGenerationType": "video"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
