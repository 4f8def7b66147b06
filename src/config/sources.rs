// src/config/sources.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::types::Source;

pub const ENV_SOURCES_PATH: &str = "NEWS_SOURCES_PATH";

/// Built-in feed registry, in display order.
pub fn default_sources() -> Vec<Source> {
    vec![
        Source::new("X 热议科技", "https://feeds.feedburner.com/TechCrunch", Some("⚡")),
        Source::new("X 热议 AI", "https://hnrss.org/frontpage", Some("🤖")),
        Source::new(
            "Google 全球热搜",
            "https://trends.google.com/trends/trendingsearches/daily/rss?geo=US",
            Some("🔥"),
        ),
        Source::new(
            "纽约时报头条",
            "https://rss.nytimes.com/services/xml/rss/nyt/HomePage.xml",
            Some("📰"),
        ),
        Source::new("BBC 全球新闻", "https://feeds.bbci.co.uk/news/world/rss.xml", Some("🌍")),
    ]
}

/// Load the registry from an explicit path. Supports TOML or JSON formats.
pub fn load_sources_from(path: &Path) -> Result<Vec<Source>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
}

/// Load the registry using env var + fallbacks:
/// 1) $NEWS_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
/// 4) built-in defaults
pub fn load_sources_default() -> Result<Vec<Source>> {
    if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        } else {
            return Err(anyhow!("NEWS_SOURCES_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Ok(default_sources())
}

/// `.toml` / `.json` pick their parser; anything else must be one of the two.
fn parse_sources(s: &str, ext: &str) -> Result<Vec<Source>> {
    match ext {
        "toml" => parse_toml(s).context("parsing sources toml"),
        "json" => parse_json(s).context("parsing sources json"),
        _ => parse_json(s)
            .or_else(|_| parse_toml(s))
            .map_err(|_| anyhow!("unsupported sources format")),
    }
}

fn parse_toml(s: &str) -> Result<Vec<Source>> {
    #[derive(serde::Deserialize)]
    struct TomlSources {
        sources: Vec<Source>,
    }
    let v: TomlSources = toml::from_str(s)?;
    Ok(clean_list(v.sources))
}

fn parse_json(s: &str) -> Result<Vec<Source>> {
    let v: Vec<Source> = serde_json::from_str(s)?;
    Ok(clean_list(v))
}

/// Trim fields, drop entries without label/url. Order is kept.
fn clean_list(items: Vec<Source>) -> Vec<Source> {
    items
        .into_iter()
        .filter_map(|s| {
            let label = s.label.trim();
            let url = s.url.trim();
            if label.is_empty() || url.is_empty() {
                return None;
            }
            let icon = s
                .icon
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty());
            Some(Source {
                label: label.to_string(),
                url: url.to_string(),
                icon,
            })
        })
        .collect()
}
