// src/config/file.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PATH: &str = "BOT_CONFIG_PATH";
const DEFAULT_PATH: &str = "config/bot.toml";

/// Optional feature toggles read from a TOML file. Environment variables win
/// over anything set here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileToggles {
    pub crypto_news_enabled: Option<bool>,
    pub world_news_enabled: Option<bool>,
    pub image_generation_type: Option<String>,
    pub post_interval_minutes: Option<u64>,
}

pub fn load_toggles_from(path: &Path) -> Result<FileToggles> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading bot config from {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Load toggles using env var + fallback:
/// 1) $BOT_CONFIG_PATH (must exist)
/// 2) config/bot.toml
/// 3) all defaults
pub fn load_toggles_default() -> Result<FileToggles> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_toggles_from(&pb);
        }
        return Err(anyhow!("{ENV_PATH} points to non-existent path"));
    }
    let default = PathBuf::from(DEFAULT_PATH);
    if default.exists() {
        return load_toggles_from(&default);
    }
    Ok(FileToggles::default())
}
