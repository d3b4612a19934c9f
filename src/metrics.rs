// src/metrics.rs
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. Only one recorder may exist per process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;

        describe_counter!("bot_runs_total", "Runs started.");
        describe_counter!("bot_run_failures_total", "Runs that ended in an error.");
        describe_counter!("bot_posts_total", "Posts published, by route.");
        describe_counter!("bot_media_generated_total", "Media files generated, by provider.");
        describe_counter!("bot_media_host_errors_total", "Secondary media host upload failures.");
        describe_gauge!("bot_scheduler_last_tick_ts", "Unix time of the last scheduler tick.");

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
