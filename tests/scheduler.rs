// tests/scheduler.rs
//
// Scheduler timing with paused tokio time.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use news_tweet_bot::scheduler::spawn_scheduler;

const MINUTE: Duration = Duration::from_secs(60);

#[tokio::test(start_paused = true)]
async fn fires_immediately_then_every_period() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let handle = spawn_scheduler(MINUTE, move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_secs(149)).await;
    // ticks at 0s, 60s, 120s
    assert_eq!(runs.load(Ordering::SeqCst), 3);
    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn slow_runs_overlap() {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let (a, p) = (active.clone(), peak.clone());

    let handle = spawn_scheduler(MINUTE, move || {
        let (a, p) = (a.clone(), p.clone());
        async move {
            let now = a.fetch_add(1, Ordering::SeqCst) + 1;
            p.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(150)).await;
            a.fetch_sub(1, Ordering::SeqCst);
        }
    });

    tokio::time::sleep(Duration::from_secs(130)).await;
    assert_eq!(peak.load(Ordering::SeqCst), 3);
    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn a_failed_run_does_not_stop_the_schedule() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let handle = spawn_scheduler(MINUTE, move || {
        let counter = counter.clone();
        async move {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                panic!("first run blows up");
            }
        }
    });

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert!(!handle.is_finished());
    handle.abort();
}
