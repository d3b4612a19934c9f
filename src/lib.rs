// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod http;
pub mod ingest;
pub mod media;
pub mod metrics;
pub mod pipeline;
pub mod publish;
pub mod scheduler;
pub mod summarize;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::config::BotConfig;
pub use crate::error::{ConfigError, PlatformError};
pub use crate::pipeline::{NewsBot, RunOptions, RunOutcome};
pub use crate::publish::{PublishResult, PublishRoute, Publisher};
