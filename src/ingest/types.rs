// src/ingest/types.rs
use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};

/// One upstream feed in the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub label: String, // e.g. "BBC 全球新闻"
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Source {
    pub fn new(label: &str, url: &str, icon: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            url: url.to_string(),
            icon: icon.map(str::to_string),
        }
    }
}

/// Search API payload: `{ hits: [...] }`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

/// One search hit as returned upstream. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHit {
    pub title: Option<String>,
    pub story_title: Option<String>,
    pub url: Option<String>,
    pub story_url: Option<String>,
    #[serde(rename = "objectID", default, deserialize_with = "string_or_number")]
    pub object_id: Option<String>,
    pub created_at: Option<String>,
}

/// Ids are strings upstream, but a bare number must not sink the whole payload.
fn string_or_number<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(serde_json::Number),
    }
    Ok(Option::<Id>::deserialize(d)?.map(|id| match id {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    }))
}

/// One RSS `<item>` / Atom `<entry>` after parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub pub_date: Option<String>,
    pub iso_date: Option<String>,
}

/// Normalized headline served by both endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    pub url: String,
    pub source: String,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_zh: Option<String>,
}

/// Fetches the raw entries of one feed. Implementations return `Err` for any
/// transport, status or parse failure; the aggregator decides what to do with it.
#[async_trait::async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, source: &Source) -> Result<Vec<RawFeedItem>>;
    fn name(&self) -> &'static str;
}
