// src/ingest/providers/mod.rs
pub mod coingecko;
pub mod cryptopanic;
pub mod hackernews;
pub mod newsapi;

use chrono::{DateTime, Utc};

/// Parse an RFC 3339 timestamp, falling back to now.
pub(crate) fn parse_rfc3339_or_now(ts: Option<&str>) -> DateTime<Utc> {
    ts.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}
