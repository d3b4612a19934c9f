// src/http.rs
use std::time::Duration;

pub const USER_AGENT: &str = concat!("news-tweet-bot/", env!("CARGO_PKG_VERSION"));

/// Outbound HTTP client with connect + total timeouts.
pub fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(4))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "custom http client failed to build; using defaults");
            reqwest::Client::new()
        })
}

/// Trim an error body for logs and error messages.
pub fn snippet(body: &str) -> String {
    const MAX: usize = 300;
    if body.chars().count() <= MAX {
        body.trim().to_string()
    } else {
        let head: String = body.chars().take(MAX).collect();
        format!("{}…", head.trim_end())
    }
}
