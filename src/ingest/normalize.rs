// src/ingest/normalize.rs
//! Raw record → `Item`. A record without a usable title or URL yields `None`.

use crate::ingest::types::{Item, RawFeedItem, RawHit, Source};

pub const SEARCH_SOURCE_LABEL: &str = "Hacker News";
const PERMALINK_BASE: &str = "https://news.ycombinator.com/item?id=";

/// First candidate that is present and non-empty.
fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates.iter().flatten().copied().find(|s| !s.is_empty())
}

pub fn normalize_hit(hit: &RawHit) -> Option<Item> {
    // Whitespace-only titles still win the fallback; they are emptied by trim below.
    let title = first_present(&[hit.title.as_deref(), hit.story_title.as_deref()])
        .unwrap_or_default()
        .trim();

    let permalink = hit
        .object_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .map(|id| format!("{PERMALINK_BASE}{id}"));
    let url = first_present(&[
        hit.url.as_deref(),
        hit.story_url.as_deref(),
        permalink.as_deref(),
    ])
    .unwrap_or_default();

    if title.is_empty() || url.is_empty() {
        return None;
    }

    Some(Item {
        title: title.to_string(),
        url: url.to_string(),
        source: SEARCH_SOURCE_LABEL.to_string(),
        published_at: first_present(&[hit.created_at.as_deref()]).map(str::to_string),
        icon: None,
        title_zh: None,
    })
}

pub fn normalize_feed_item(raw: &RawFeedItem, source: &Source) -> Option<Item> {
    let title = raw.title.as_deref().unwrap_or_default().trim();
    let url = raw.link.as_deref().unwrap_or_default().trim();
    if title.is_empty() || url.is_empty() {
        return None;
    }

    Some(Item {
        title: title.to_string(),
        url: url.to_string(),
        source: source.label.clone(),
        published_at: first_present(&[raw.pub_date.as_deref(), raw.iso_date.as_deref()])
            .map(str::to_string),
        icon: source.icon.clone(),
        title_zh: None,
    })
}
