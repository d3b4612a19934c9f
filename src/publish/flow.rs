// src/publish/flow.rs
//! The publisher's fallback chain as plain data + pure transitions, so every
//! branch can be checked without touching the network.

use crate::compose::{char_len, truncate_with_ellipsis, ELLIPSIS};
use crate::error::PlatformError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStep {
    /// Upload the media to the platform and post with it attached.
    DirectAttempt,
    /// Put the media on the secondary host and post its link.
    SecondaryHostAttempt,
    /// Post the body without media. Terminal.
    TextOnly,
}

pub fn initial_step(media_available: bool) -> PublishStep {
    if media_available {
        PublishStep::DirectAttempt
    } else {
        PublishStep::TextOnly
    }
}

/// Only a tier rejection with a host to escalate to leaves the text-only path.
pub fn after_direct_failure(err: &PlatformError, host_configured: bool) -> PublishStep {
    if err.is_tier_rejection() && host_configured {
        PublishStep::SecondaryHostAttempt
    } else {
        PublishStep::TextOnly
    }
}

pub fn after_host_failure() -> PublishStep {
    PublishStep::TextOnly
}

/// Room left for body text once `\n{url}` is appended. `None` when the URL
/// alone is over the limit.
pub fn max_text_len(limit: usize, url: &str) -> Option<usize> {
    let url_len = char_len(url);
    if url_len > limit {
        return None;
    }
    Some(limit.saturating_sub(url_len + 1))
}

/// Body, a newline, then the URL untouched at the end. The body is sent as-is
/// when it fits and cut with an ellipsis when it does not. The result never
/// exceeds `limit`; when a cut body would have no room left for text the post
/// is the URL alone.
pub fn fit_text_with_link(body: &str, url: &str, limit: usize) -> Option<String> {
    let max_text = max_text_len(limit, url)?;

    if char_len(body) <= max_text {
        if body.is_empty() {
            return Some(url.to_string());
        }
        return Some(format!("{body}\n{url}"));
    }
    if max_text <= ELLIPSIS.len() {
        return Some(url.to_string());
    }
    Some(format!("{}\n{url}", truncate_with_ellipsis(body, max_text)))
}
