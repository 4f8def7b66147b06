// src/ingest/mod.rs
pub mod normalize;
pub mod providers;
pub mod types;

use anyhow::Result;
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::ingest::normalize::{normalize_feed_item, normalize_hit};
use crate::ingest::providers::hn_search::SearchClient;
use crate::ingest::types::{FeedFetcher, Item, Source};
use crate::translate::{translate_items, Translator};

/// Upper bound on items per response (and on translation calls per request).
pub const MAX_ITEMS: usize = 20;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("search_requests_total", "Search API calls issued.");
        describe_counter!(
            "search_upstream_errors_total",
            "Search API calls answered with a non-2xx status."
        );
        describe_counter!("feed_items_total", "Raw entries taken from feeds.");
        describe_counter!(
            "feed_source_errors_total",
            "Feed fetch/parse failures (source contributed nothing)."
        );
        describe_histogram!("feed_fetch_ms", "Feed download time in milliseconds.");
        describe_histogram!("feed_parse_ms", "Feed parse time in milliseconds.");
        describe_counter!("translate_requests_total", "Translation calls issued.");
        describe_counter!(
            "translate_fallback_total",
            "Translations that fell back to the original text."
        );
    });
}

/// Search pipeline: one upstream call, normalize, keep the first `MAX_ITEMS`.
/// Any upstream failure is returned to the caller.
pub async fn collect_search(client: &SearchClient) -> Result<Vec<Item>> {
    ensure_metrics_described();
    let hits = client.fetch_hits().await?;
    let items: Vec<Item> = hits.iter().filter_map(normalize_hit).take(MAX_ITEMS).collect();
    debug!(hits = hits.len(), kept = items.len(), "search collected");
    Ok(items)
}

/// Fetch + normalize one source. Failures are logged and yield an empty list.
async fn fetch_source(fetcher: &dyn FeedFetcher, source: &Source) -> Vec<Item> {
    match fetcher.fetch(source).await {
        Ok(raw) => raw
            .iter()
            .filter_map(|r| normalize_feed_item(r, source))
            .collect(),
        Err(e) => {
            warn!(source = %source.label, error = ?e, "feed error");
            counter!("feed_source_errors_total", "source" => source.label.clone()).increment(1);
            Vec::new()
        }
    }
}

/// Fan out to every source at once and flatten in registry order
/// (positional, not completion order). Keeps at most `MAX_ITEMS`.
pub async fn collect_feeds(fetcher: &dyn FeedFetcher, sources: &[Source]) -> Vec<Item> {
    ensure_metrics_described();
    let per_source = futures::future::join_all(sources.iter().map(|s| fetch_source(fetcher, s))).await;

    per_source
        .into_iter()
        .flatten()
        .filter(|i| !i.title.is_empty() && !i.url.is_empty())
        .take(MAX_ITEMS)
        .collect()
}

/// Trends pipeline: fan-out collection followed by the sequential translation pass.
pub async fn collect_trends(
    fetcher: &dyn FeedFetcher,
    sources: &[Source],
    translator: &dyn Translator,
) -> Vec<Item> {
    let items = collect_feeds(fetcher, sources).await;
    debug!(
        items = items.len(),
        translator = translator.provider_name(),
        "translating titles"
    );
    translate_items(items, translator).await
}
