use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::ingest::providers::{hn_search::SearchClient, rss::HttpFeedFetcher};
use crate::ingest::types::{FeedFetcher, Item, Source};
use crate::ingest::{collect_search, collect_trends};
use crate::translate::{DynTranslator, MyMemoryTranslator, PassthroughTranslator};

/// User-facing text of every 500 response ("failed to fetch news").
pub const FAILURE_MESSAGE: &str = "获取资讯失败";

/// Shared, read-only collaborators. Built once, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub search: SearchClient,
    pub feeds: Arc<dyn FeedFetcher>,
    pub sources: Arc<Vec<Source>>,
    pub translator: DynTranslator,
}

impl AppState {
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("building http client")?;

        let translator: DynTranslator = if cfg.translate_enabled {
            Arc::new(MyMemoryTranslator::new(
                http.clone(),
                cfg.translate_url.clone(),
                cfg.translate_langpair.clone(),
                cfg.translate_timeout,
            ))
        } else {
            Arc::new(PassthroughTranslator)
        };

        info!(
            sources = cfg.sources.len(),
            translator = translator.provider_name(),
            "app state ready"
        );

        Ok(Self {
            search: SearchClient::new(http.clone(), cfg.search_url.clone(), cfg.feed_timeout),
            feeds: Arc::new(HttpFeedFetcher::new(
                http,
                cfg.feed_timeout,
                cfg.user_agent.clone(),
            )),
            sources: Arc::new(cfg.sources.clone()),
            translator,
        })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_config(&AppConfig::from_env()?)
    }
}

/// Edge-cache directive for a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub s_maxage: u32,
    pub stale_while_revalidate: u32,
}

impl CachePolicy {
    pub fn header_value(&self) -> String {
        format!(
            "s-maxage={}, stale-while-revalidate={}",
            self.s_maxage, self.stale_while_revalidate
        )
    }
}

pub const NEWS_CACHE: CachePolicy = CachePolicy {
    s_maxage: 20,
    stale_while_revalidate: 60,
};
// Feeds + sequential translation cost more per request; cache longer.
pub const TRENDS_CACHE: CachePolicy = CachePolicy {
    s_maxage: 60,
    stale_while_revalidate: 300,
};

#[derive(Serialize)]
struct ItemsPayload {
    #[serde(rename = "updatedAt")]
    updated_at: String,
    items: Vec<Item>,
}

#[derive(Serialize)]
struct ErrorPayload {
    message: &'static str,
    detail: String,
    #[serde(rename = "updatedAt")]
    updated_at: String,
    items: Vec<Item>,
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 200 + cache header on success; 500 with the degraded envelope otherwise.
pub fn build_response(result: anyhow::Result<Vec<Item>>, cache: CachePolicy) -> Response {
    match result {
        Ok(items) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, cache.header_value())],
            Json(ItemsPayload {
                updated_at: now_iso(),
                items,
            }),
        )
            .into_response(),
        Err(e) => {
            warn!(error = ?e, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorPayload {
                    message: FAILURE_MESSAGE,
                    detail: format!("{e:#}"),
                    updated_at: now_iso(),
                    items: Vec::new(),
                }),
            )
                .into_response()
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/news", any(news))
        .route("/api/x-trends", any(x_trends))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn news(State(state): State<AppState>) -> Response {
    build_response(collect_search(&state.search).await, NEWS_CACHE)
}

async fn x_trends(State(state): State<AppState>) -> Response {
    let items = collect_trends(
        state.feeds.as_ref(),
        &state.sources,
        state.translator.as_ref(),
    )
    .await;
    build_response(Ok(items), TRENDS_CACHE)
}
