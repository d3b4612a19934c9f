// src/config/bot.rs
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::config::file::FileToggles;
use crate::error::ConfigError;
use crate::media::ImageKind;

pub const DEFAULT_TEXT_LIMIT: usize = 280;
pub const DEFAULT_INTERVAL_MINUTES: u64 = 60;
/// One week.
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_IMAGE_MODEL: &str = "dall-e-3";

#[derive(Clone, Default, PartialEq, Eq)]
pub struct TwitterCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

// Never print secrets, only whether they are set.
impl std::fmt::Debug for TwitterCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterCredentials")
            .field("api_key_len", &self.api_key.len())
            .field("access_token_len", &self.access_token.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    Imgur,
    Dropbox,
    UploadMe,
}

impl FromStr for HostKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "imgur" => Ok(HostKind::Imgur),
            "dropbox" => Ok(HostKind::Dropbox),
            "uploadme" => Ok(HostKind::UploadMe),
            _ => Err(ConfigError::InvalidValue {
                key: "MEDIA_FALLBACK_HOST",
                value: s.to_string(),
            }),
        }
    }
}

/// The secondary host the publisher may fall back to.
#[derive(Clone, PartialEq, Eq)]
pub enum MediaHostConfig {
    Imgur { client_id: String },
    Dropbox { access_token: String },
    UploadMe { api_key: String },
}

impl MediaHostConfig {
    pub fn kind(&self) -> HostKind {
        match self {
            MediaHostConfig::Imgur { .. } => HostKind::Imgur,
            MediaHostConfig::Dropbox { .. } => HostKind::Dropbox,
            MediaHostConfig::UploadMe { .. } => HostKind::UploadMe,
        }
    }
}

impl std::fmt::Debug for MediaHostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MediaHostConfig({:?})", self.kind())
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct HostCredentials {
    pub imgur_client_id: Option<String>,
    pub dropbox_access_token: Option<String>,
    pub uploadme_api_key: Option<String>,
    pub preferred: Option<HostKind>,
}

impl std::fmt::Debug for HostCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostCredentials")
            .field("imgur", &self.imgur_client_id.is_some())
            .field("dropbox", &self.dropbox_access_token.is_some())
            .field("uploadme", &self.uploadme_api_key.is_some())
            .field("preferred", &self.preferred)
            .finish()
    }
}

impl HostCredentials {
    /// Resolve which secondary host to use. The preferred host wins when its
    /// credential is present; otherwise the first configured one in
    /// Imgur, Dropbox, UploadMe order.
    pub fn resolve(&self) -> Option<MediaHostConfig> {
        let pick = |kind: HostKind| -> Option<MediaHostConfig> {
            match kind {
                HostKind::Imgur => self
                    .imgur_client_id
                    .clone()
                    .map(|client_id| MediaHostConfig::Imgur { client_id }),
                HostKind::Dropbox => self
                    .dropbox_access_token
                    .clone()
                    .map(|access_token| MediaHostConfig::Dropbox { access_token }),
                HostKind::UploadMe => self
                    .uploadme_api_key
                    .clone()
                    .map(|api_key| MediaHostConfig::UploadMe { api_key }),
            }
        };
        if let Some(found) = self.preferred.and_then(pick) {
            return Some(found);
        }
        [HostKind::Imgur, HostKind::Dropbox, HostKind::UploadMe]
            .into_iter()
            .find_map(pick)
    }
}

/// Process-wide configuration, built once and passed into every component.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub twitter: TwitterCredentials,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_image_model: String,
    pub news_api_key: Option<String>,
    pub cryptopanic_token: Option<String>,
    pub hosts: HostCredentials,
    pub crypto_news_enabled: bool,
    pub world_news_enabled: bool,
    pub image_kind: ImageKind,
    pub interval_minutes: u64,
    pub scratch_dir: PathBuf,
    pub text_limit: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            twitter: TwitterCredentials::default(),
            openai_api_key: String::new(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_image_model: DEFAULT_OPENAI_IMAGE_MODEL.to_string(),
            news_api_key: None,
            cryptopanic_token: None,
            hosts: HostCredentials::default(),
            crypto_news_enabled: true,
            world_news_enabled: true,
            image_kind: ImageKind::Ai,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            scratch_dir: default_scratch_dir(),
            text_limit: DEFAULT_TEXT_LIMIT,
        }
    }
}

pub fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir().join("news_tweet_bot")
}

impl BotConfig {
    /// Read configuration from the process environment, layered over the
    /// optional TOML toggles file.
    pub fn from_env(file: &FileToggles) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), file)
    }

    /// Build from any key lookup. Empty or whitespace-only values count as unset.
    pub fn from_lookup<F>(lookup: F, file: &FileToggles) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| -> Option<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = BotConfig::default();

        let crypto_news_enabled = match get("CRYPTO_NEWS_ENABLED") {
            Some(v) => parse_bool("CRYPTO_NEWS_ENABLED", &v)?,
            None => file.crypto_news_enabled.unwrap_or(true),
        };
        let world_news_enabled = match get("WORLD_NEWS_ENABLED") {
            Some(v) => parse_bool("WORLD_NEWS_ENABLED", &v)?,
            None => file.world_news_enabled.unwrap_or(true),
        };

        let image_kind = match get("IMAGE_GENERATION_TYPE").or_else(|| file.image_generation_type.clone()) {
            Some(v) => v.parse::<ImageKind>().map_err(|_| ConfigError::InvalidValue {
                key: "IMAGE_GENERATION_TYPE",
                value: v,
            })?,
            None => defaults.image_kind,
        };

        let interval_minutes = match get("POST_INTERVAL_MINUTES") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|m| (1..=MAX_INTERVAL_MINUTES).contains(m))
                .ok_or(ConfigError::InvalidValue {
                    key: "POST_INTERVAL_MINUTES",
                    value: v,
                })?,
            None => match file.post_interval_minutes {
                Some(m) if !(1..=MAX_INTERVAL_MINUTES).contains(&m) => {
                    return Err(ConfigError::InvalidValue {
                        key: "POST_INTERVAL_MINUTES",
                        value: m.to_string(),
                    })
                }
                Some(m) => m,
                None => defaults.interval_minutes,
            },
        };

        let preferred = get("MEDIA_FALLBACK_HOST")
            .map(|v| v.parse::<HostKind>())
            .transpose()?;

        Ok(Self {
            twitter: TwitterCredentials {
                api_key: get("TWITTER_API_KEY").unwrap_or_default(),
                api_secret: get("TWITTER_API_SECRET").unwrap_or_default(),
                access_token: get("TWITTER_ACCESS_TOKEN").unwrap_or_default(),
                access_secret: get("TWITTER_ACCESS_SECRET").unwrap_or_default(),
            },
            openai_api_key: get("OPENAI_API_KEY").unwrap_or_default(),
            openai_model: get("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_image_model: get("OPENAI_IMAGE_MODEL").unwrap_or(defaults.openai_image_model),
            news_api_key: get("NEWS_API_KEY").filter(|k| !k.eq_ignore_ascii_case("demo")),
            cryptopanic_token: get("CRYPTOPANIC_API_TOKEN"),
            hosts: HostCredentials {
                imgur_client_id: get("IMGUR_CLIENT_ID"),
                dropbox_access_token: get("DROPBOX_ACCESS_TOKEN"),
                uploadme_api_key: get("UPLOADME_API_KEY"),
                preferred,
            },
            crypto_news_enabled,
            world_news_enabled,
            image_kind,
            interval_minutes,
            scratch_dir: get("BOT_SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.scratch_dir),
            text_limit: DEFAULT_TEXT_LIMIT,
        })
    }

    /// Required keys that are still empty.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let required = [
            ("twitter_api_key", &self.twitter.api_key),
            ("twitter_api_secret", &self.twitter.api_secret),
            ("twitter_access_token", &self.twitter.access_token),
            ("twitter_access_secret", &self.twitter.access_secret),
            ("openai_api_key", &self.openai_api_key),
        ];
        required
            .into_iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| k)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing = self.missing_credentials();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingCredentials(missing))
        }
    }

    /// Scheduler period. Re-checked here because the CLI can override the
    /// interval after the environment was parsed.
    pub fn schedule_period(&self) -> Result<Duration, ConfigError> {
        Some(self.interval_minutes)
            .filter(|m| (1..=MAX_INTERVAL_MINUTES).contains(m))
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
            .ok_or(ConfigError::InvalidValue {
                key: "POST_INTERVAL_MINUTES",
                value: self.interval_minutes.to_string(),
            })
    }

    pub fn media_host(&self) -> Option<MediaHostConfig> {
        self.hosts.resolve()
    }

    /// Copy of this config with inline request credentials layered on top.
    pub fn with_overrides(&self, o: &CredentialOverrides) -> Self {
        fn pick(over: &Option<String>) -> Option<String> {
            over.as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        }
        let mut cfg = self.clone();
        if let Some(v) = pick(&o.twitter_api_key) {
            cfg.twitter.api_key = v;
        }
        if let Some(v) = pick(&o.twitter_api_secret) {
            cfg.twitter.api_secret = v;
        }
        if let Some(v) = pick(&o.twitter_access_token) {
            cfg.twitter.access_token = v;
        }
        if let Some(v) = pick(&o.twitter_access_secret) {
            cfg.twitter.access_secret = v;
        }
        if let Some(v) = pick(&o.openai_api_key) {
            cfg.openai_api_key = v;
        }
        if let Some(v) = pick(&o.news_api_key) {
            cfg.news_api_key = Some(v).filter(|k| !k.eq_ignore_ascii_case("demo"));
        }
        if let Some(v) = pick(&o.imgur_client_id) {
            cfg.hosts.imgur_client_id = Some(v);
        }
        if let Some(v) = pick(&o.dropbox_access_token) {
            cfg.hosts.dropbox_access_token = Some(v);
        }
        if let Some(v) = pick(&o.uploadme_api_key) {
            cfg.hosts.uploadme_api_key = Some(v);
        }
        cfg
    }
}

/// Inline credentials accepted by `POST /run`.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialOverrides {
    pub twitter_api_key: Option<String>,
    pub twitter_api_secret: Option<String>,
    pub twitter_access_token: Option<String>,
    pub twitter_access_secret: Option<String>,
    pub openai_api_key: Option<String>,
    pub news_api_key: Option<String>,
    pub imgur_client_id: Option<String>,
    pub dropbox_access_token: Option<String>,
    #[serde(rename = "uploadMeApiKey")]
    pub uploadme_api_key: Option<String>,
}

impl std::fmt::Debug for CredentialOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CredentialOverrides(..)")
    }
}

fn parse_bool(key: &'static str, v: &str) -> Result<bool, ConfigError> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: v.to_string(),
        }),
    }
}
