// tests/common/mod.rs
// Shared helpers: stub upstream servers and router plumbing.
#![allow(dead_code)]

use axum::{
    body::{self, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use std::time::Duration;
use tower::ServiceExt as _; // for `oneshot`

use news_relay::config::AppConfig;
use news_relay::Source;

const BODY_LIMIT: usize = 1024 * 1024;

pub const FEED_A: &str = include_str!("../fixtures/feed_a.xml");
pub const FEED_ATOM: &str = include_str!("../fixtures/feed_atom.xml");
pub const FEED_NYT: &str = include_str!("../fixtures/feed_nyt.xml");

/// Serve `app` on an ephemeral local port; returns its base URL.
pub async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub serve");
    });
    format!("http://{addr}")
}

/// Config pointing every upstream at `base`, with short timeouts.
pub fn stub_config(base: &str, sources: Vec<Source>) -> AppConfig {
    AppConfig {
        search_url: format!("{base}/search"),
        translate_url: format!("{base}/translate"),
        feed_timeout: Duration::from_millis(1_500),
        translate_timeout: Duration::from_millis(1_500),
        sources,
        ..AppConfig::default()
    }
}

/// Send `method path` through the router; returns (status, headers, json body).
pub async fn call(app: &Router, method: &str, path: &str) -> (StatusCode, HeaderMap, Json) {
    let req = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .expect("build request");
    let resp = app.clone().oneshot(req).await.expect("router response");
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v: Json = serde_json::from_slice(&bytes).expect("json body");
    (status, headers, v)
}

pub fn cache_control(headers: &HeaderMap) -> Option<String> {
    headers
        .get("cache-control")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
}
