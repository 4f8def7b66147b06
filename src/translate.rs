//! Title translation: provider abstraction + MyMemory client.
//! Translation is best-effort. Every failure falls back to the original text.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::Deserialize;
use tracing::debug;

use crate::ingest::types::Item;

pub const DEFAULT_TRANSLATE_URL: &str = "https://api.mymemory.translated.net/get";
pub const DEFAULT_LANGPAIR: &str = "en|zh-CN";
/// Upstream rejects queries above 500 chars; leave headroom.
pub const MAX_QUERY_CHARS: usize = 450;

/// Translates one string. Never fails: implementations return the input on error.
pub trait Translator: Send + Sync {
    fn translate<'a>(&'a self, text: &'a str) -> Pin<Box<dyn Future<Output = String> + Send + 'a>>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub type DynTranslator = Arc<dyn Translator>;

/// First `MAX_QUERY_CHARS` characters of `text` (char boundaries, not bytes).
pub fn truncate_query(text: &str) -> &str {
    match text.char_indices().nth(MAX_QUERY_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// MyMemory free API (no key).
pub struct MyMemoryTranslator {
    http: reqwest::Client,
    endpoint: String,
    langpair: String,
    timeout: Duration,
}

impl MyMemoryTranslator {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        langpair: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            langpair: langpair.into(),
            timeout,
        }
    }

    async fn request(&self, query: &str) -> anyhow::Result<Option<String>> {
        #[derive(Deserialize)]
        struct Resp {
            #[serde(rename = "responseStatus", default)]
            response_status: serde_json::Value,
            #[serde(rename = "responseData")]
            response_data: Option<RespData>,
        }
        #[derive(Deserialize)]
        struct RespData {
            #[serde(rename = "translatedText")]
            translated_text: Option<String>,
        }

        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[("q", query), ("langpair", self.langpair.as_str())])
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        let body: Resp = resp.json().await?;

        // responseStatus comes back as a number on success, sometimes a string on errors
        if body.response_status.as_u64() != Some(200) {
            return Ok(None);
        }
        Ok(body.response_data.and_then(|d| d.translated_text))
    }
}

impl Translator for MyMemoryTranslator {
    fn translate<'a>(&'a self, text: &'a str) -> Pin<Box<dyn Future<Output = String> + Send + 'a>> {
        Box::pin(async move {
            if text.trim().is_empty() {
                return String::new();
            }
            counter!("translate_requests_total").increment(1);

            match self.request(truncate_query(text)).await {
                Ok(Some(translated)) => translated,
                Ok(None) => {
                    counter!("translate_fallback_total").increment(1);
                    debug!(provider = "mymemory", "translation refused; keeping original");
                    text.to_string()
                }
                Err(e) => {
                    counter!("translate_fallback_total").increment(1);
                    debug!(provider = "mymemory", error = ?e, "translation failed; keeping original");
                    text.to_string()
                }
            }
        })
    }

    fn provider_name(&self) -> &'static str {
        "mymemory"
    }
}

/// Returns the input unchanged; used when translation is disabled.
pub struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    fn translate<'a>(&'a self, text: &'a str) -> Pin<Box<dyn Future<Output = String> + Send + 'a>> {
        Box::pin(async move { text.to_string() })
    }
    fn provider_name(&self) -> &'static str {
        "passthrough"
    }
}

/// Fill `title_zh` for every item, strictly one call at a time and in order.
/// Running these concurrently trips the upstream rate limit (HTTP 429).
pub async fn translate_items(items: Vec<Item>, translator: &dyn Translator) -> Vec<Item> {
    let mut out = Vec::with_capacity(items.len());
    for mut item in items {
        let title_zh = translator.translate(&item.title).await;
        item.title_zh = Some(title_zh);
        out.push(item);
    }
    out
}
