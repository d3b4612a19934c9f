// src/error.rs
use thiserror::Error;

/// Failures returned by the posting platform.
///
/// The publisher only branches on one distinction: whether the platform
/// refused the request because of the account's API tier.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("platform rejected the request for this access tier ({status}): {detail}")]
    TierRejected { status: u16, detail: String },

    #[error("platform returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("platform request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("reading media file failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected platform response: {0}")]
    Malformed(String),
}

impl PlatformError {
    pub fn is_tier_rejection(&self) -> bool {
        matches!(self, PlatformError::TierRejected { .. })
    }

    /// Map a non-success HTTP status to the matching variant.
    pub fn from_status(status: u16, body: String) -> Self {
        if status == 403 {
            PlatformError::TierRejected {
                status,
                detail: body,
            }
        } else {
            PlatformError::Status { status, body }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_status_is_a_tier_rejection() {
        assert!(PlatformError::from_status(403, "nope".into()).is_tier_rejection());
        assert!(!PlatformError::from_status(500, "boom".into()).is_tier_rejection());
        assert!(!PlatformError::from_status(401, "auth".into()).is_tier_rejection());
    }

    #[test]
    fn missing_credentials_lists_keys() {
        let e = ConfigError::MissingCredentials(vec!["twitter_api_key", "openai_api_key"]);
        assert_eq!(
            e.to_string(),
            "Missing credentials: twitter_api_key, openai_api_key"
        );
    }
}
