// src/config/mod.rs
//! Runtime configuration read once at startup.

pub mod sources;

use std::time::Duration;

use crate::ingest::providers::hn_search::DEFAULT_SEARCH_URL;
use crate::ingest::types::Source;
use crate::translate::{DEFAULT_LANGPAIR, DEFAULT_TRANSLATE_URL};

pub const ENV_SEARCH_URL: &str = "NEWS_SEARCH_URL";
pub const ENV_TRANSLATE_URL: &str = "NEWS_TRANSLATE_URL";
pub const ENV_TRANSLATE_LANGPAIR: &str = "NEWS_TRANSLATE_LANGPAIR";
pub const ENV_TRANSLATE_ENABLED: &str = "NEWS_TRANSLATE_ENABLED";
pub const ENV_FEED_TIMEOUT_MS: &str = "NEWS_FEED_TIMEOUT_MS";
pub const ENV_TRANSLATE_TIMEOUT_MS: &str = "NEWS_TRANSLATE_TIMEOUT_MS";
pub const ENV_USER_AGENT: &str = "NEWS_USER_AGENT";

pub const DEFAULT_FEED_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_TRANSLATE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; NewsBot/1.0)";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub search_url: String,
    pub translate_url: String,
    pub translate_langpair: String,
    pub translate_enabled: bool,
    pub feed_timeout: Duration,
    pub translate_timeout: Duration,
    pub user_agent: String,
    pub sources: Vec<Source>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            translate_langpair: DEFAULT_LANGPAIR.to_string(),
            translate_enabled: true,
            feed_timeout: Duration::from_millis(DEFAULT_FEED_TIMEOUT_MS),
            translate_timeout: Duration::from_millis(DEFAULT_TRANSLATE_TIMEOUT_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sources: sources::default_sources(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `NEWS_*` env vars; registry via `sources::load_sources_default`.
    pub fn from_env() -> anyhow::Result<Self> {
        let d = Self::default();
        Ok(Self {
            search_url: env_string(ENV_SEARCH_URL).unwrap_or(d.search_url),
            translate_url: env_string(ENV_TRANSLATE_URL).unwrap_or(d.translate_url),
            translate_langpair: env_string(ENV_TRANSLATE_LANGPAIR)
                .unwrap_or(d.translate_langpair),
            translate_enabled: env_string(ENV_TRANSLATE_ENABLED)
                .map(|v| parse_flag(&v))
                .unwrap_or(d.translate_enabled),
            feed_timeout: env_millis(ENV_FEED_TIMEOUT_MS).unwrap_or(d.feed_timeout),
            translate_timeout: env_millis(ENV_TRANSLATE_TIMEOUT_MS).unwrap_or(d.translate_timeout),
            user_agent: env_string(ENV_USER_AGENT).unwrap_or(d.user_agent),
            sources: sources::load_sources_default()?,
        })
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_millis(key: &str) -> Option<Duration> {
    env_string(key)
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

fn parse_flag(v: &str) -> bool {
    !matches!(
        v.to_ascii_lowercase().as_str(),
        "0" | "false" | "off" | "no"
    )
}
