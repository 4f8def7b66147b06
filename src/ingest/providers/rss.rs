// src/ingest/providers/rss.rs
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{
    format_description::well_known::{Rfc2822, Rfc3339},
    OffsetDateTime, UtcOffset,
};

use crate::ingest::types::{FeedFetcher, RawFeedItem, Source};

/// Entries taken from the top of each feed.
pub const MAX_ITEMS_PER_SOURCE: usize = 6;

// --- RSS 2.0 ---
#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<RssItem>,
}
// Elements are matched by local name, so `<atom:link>` / `<dc:title>` land in the
// same field as `<link>` / `<title>`. Collect every occurrence, keep the first text.
#[derive(Debug, Deserialize)]
struct RssItem {
    #[serde(rename = "title", default)]
    titles: Vec<XmlText>,
    #[serde(rename = "link", default)]
    links: Vec<XmlText>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

// --- Atom ---
#[derive(Debug, Deserialize)]
struct Atom {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}
#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(rename = "title", default)]
    titles: Vec<XmlText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    published: Option<String>,
    updated: Option<String>,
}
/// Element text; attributes (`href`, `rel`, `type`) are ignored.
#[derive(Debug, Deserialize)]
struct XmlText {
    #[serde(rename = "$text", default)]
    value: String,
}

fn first_text(values: Vec<XmlText>) -> Option<String> {
    values
        .into_iter()
        .map(|t| t.value)
        .find(|v| !v.trim().is_empty())
}
#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

fn rfc2822_to_iso(ts: &str) -> Option<String> {
    OffsetDateTime::parse(ts.trim(), &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC))
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

impl From<RssItem> for RawFeedItem {
    fn from(it: RssItem) -> Self {
        let iso_date = it.pub_date.as_deref().and_then(rfc2822_to_iso);
        Self {
            title: first_text(it.titles),
            link: first_text(it.links),
            pub_date: it.pub_date,
            iso_date,
        }
    }
}

impl From<AtomEntry> for RawFeedItem {
    fn from(e: AtomEntry) -> Self {
        // rel="alternate" is the default when rel is omitted
        let link = e
            .links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .or_else(|| e.links.first())
            .and_then(|l| l.href.clone());
        let stamp = e.published.or(e.updated);
        Self {
            title: first_text(e.titles),
            link,
            pub_date: stamp.clone(),
            iso_date: stamp,
        }
    }
}

/// Parse an RSS 2.0 or Atom document into raw entries (document order).
pub fn parse_feed(xml: &str) -> Result<Vec<RawFeedItem>> {
    let t0 = std::time::Instant::now();
    let xml_clean = scrub_html_entities_for_xml(xml);

    let items: Vec<RawFeedItem> = match from_str::<Rss>(&xml_clean) {
        Ok(rss) => rss.channel.item.into_iter().map(Into::into).collect(),
        Err(rss_err) => match from_str::<Atom>(&xml_clean) {
            Ok(atom) if !atom.entry.is_empty() || looks_like_atom(&xml_clean) => {
                atom.entry.into_iter().map(Into::into).collect()
            }
            _ => return Err(anyhow!(rss_err)).context("parsing feed xml (rss/atom)"),
        },
    };

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("feed_parse_ms").record(ms);
    Ok(items)
}

fn looks_like_atom(xml: &str) -> bool {
    xml.contains("<feed")
}

/// Entities HTML-minded publishers leak into XML that the XML parser rejects.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}

/// Fetches feeds over HTTP with the shared client.
#[derive(Clone)]
pub struct HttpFeedFetcher {
    client: reqwest::Client,
    timeout: Duration,
    user_agent: String,
}

impl HttpFeedFetcher {
    pub fn new(client: reqwest::Client, timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            timeout,
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, source: &Source) -> Result<Vec<RawFeedItem>> {
        let t0 = std::time::Instant::now();
        let resp = self
            .client
            .get(&source.url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("{} http get()", source.label))?
            .error_for_status()
            .with_context(|| format!("{} http status", source.label))?;
        let body = resp
            .text()
            .await
            .with_context(|| format!("{} http .text()", source.label))?;
        histogram!("feed_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        let mut items = parse_feed(&body).with_context(|| format!("{} feed", source.label))?;
        items.truncate(MAX_ITEMS_PER_SOURCE);
        counter!("feed_items_total").increment(items.len() as u64);
        Ok(items)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
