// src/ingest/providers/hn_search.rs
use std::time::Duration;

use anyhow::{bail, Context, Result};
use metrics::counter;
use reqwest::header::ACCEPT;

use crate::ingest::types::{RawHit, SearchResponse};

pub const DEFAULT_SEARCH_URL: &str =
    "https://hn.algolia.com/api/v1/search_by_date?tags=story&hitsPerPage=30";

/// Client for the JSON search endpoint. A single source: any failure here is
/// a failure of the whole request.
#[derive(Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl SearchClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }

    pub async fn fetch_hits(&self) -> Result<Vec<RawHit>> {
        counter!("search_requests_total").increment(1);

        let resp = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .context("search http get()")?;

        let status = resp.status();
        if !status.is_success() {
            counter!("search_upstream_errors_total").increment(1);
            bail!("Upstream error: {}", status.as_u16());
        }

        let body: SearchResponse = resp.json().await.context("search json body")?;
        Ok(body.hits)
    }
}
