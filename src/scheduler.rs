// src/scheduler.rs
use std::future::Future;
use std::time::Duration;

use metrics::gauge;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Fire `job` right away and then once per `period`.
///
/// Each tick spawns the job as its own task and does not wait for it, so a
/// slow run can overlap the next one. Jobs handle their own errors; a failed
/// run is simply followed by the next tick.
pub fn spawn_scheduler<F, Fut>(period: Duration, job: F) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut tick: u64 = 0;
        loop {
            ticker.tick().await;
            tick += 1;
            gauge!("bot_scheduler_last_tick_ts").set(chrono::Utc::now().timestamp() as f64);
            tracing::info!(tick, period_secs = period.as_secs(), "scheduled run starting");
            tokio::spawn(job());
        }
    })
}
