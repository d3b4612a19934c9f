// src/config/mod.rs
pub mod bot;
pub mod file;

pub use bot::{BotConfig, CredentialOverrides, HostCredentials, HostKind, MediaHostConfig, TwitterCredentials};
pub use file::FileToggles;
