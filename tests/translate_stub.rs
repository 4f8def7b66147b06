// tests/translate_stub.rs
//
// MyMemory client against a capturing stub.
//
// Covered:
// - outgoing query is truncated to 450 chars; fallback returns the full original
// - language pair is sent
// - non-200 responseStatus, HTTP error, malformed body, timeout → original text

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use common::spawn_stub;
use news_relay::translate::{MyMemoryTranslator, Translator, DEFAULT_LANGPAIR, MAX_QUERY_CHARS};

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn capture(State(seen): State<Seen>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    seen.lock().unwrap().push(q);
    Json(json!({ "responseStatus": 403, "responseData": { "translatedText": "QUERY LENGTH LIMIT EXCEEDED" } }))
}

async fn ok(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let text = q.get("q").cloned().unwrap_or_default();
    Json(json!({ "responseStatus": 200, "responseData": { "translatedText": format!("译:{text}") } }))
}

async fn stub() -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/capture", get(capture))
        .route("/ok", get(ok))
        .route("/status-string", get(|| async {
            Json(json!({ "responseStatus": "200", "responseData": { "translatedText": "x" } }))
        }))
        .route("/http-500", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/not-json", get(|| async { "rate limited" }))
        .route("/slow", get(|| async {
            tokio::time::sleep(Duration::from_millis(1_500)).await;
            Json(json!({ "responseStatus": 200, "responseData": { "translatedText": "late" } }))
        }))
        .with_state(seen.clone());
    (spawn_stub(app).await, seen)
}

fn client(base: &str, path: &str, timeout_ms: u64) -> MyMemoryTranslator {
    MyMemoryTranslator::new(
        reqwest::Client::new(),
        format!("{base}{path}"),
        DEFAULT_LANGPAIR,
        Duration::from_millis(timeout_ms),
    )
}

#[tokio::test]
async fn long_input_is_truncated_before_submission() {
    let (base, seen) = stub().await;
    let t = client(&base, "/capture", 2_000);

    let long = format!("{}{}", "a".repeat(440), "é".repeat(100));
    let out = t.translate(&long).await;

    // Refused → caller gets the full, untruncated original back.
    assert_eq!(out, long);

    let calls = seen.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let sent = &calls[0]["q"];
    assert_eq!(sent.chars().count(), MAX_QUERY_CHARS);
    assert!(long.starts_with(sent.as_str()));
    assert_eq!(calls[0]["langpair"], "en|zh-CN");
}

#[tokio::test]
async fn short_input_is_sent_verbatim() {
    let (base, seen) = stub().await;
    let t = client(&base, "/capture", 2_000);
    t.translate("Markets open higher").await;
    assert_eq!(seen.lock().unwrap()[0]["q"], "Markets open higher");
}

#[tokio::test]
async fn success_returns_translated_text() {
    let (base, _seen) = stub().await;
    let t = client(&base, "/ok", 2_000);
    assert_eq!(t.translate("Hello & goodbye").await, "译:Hello & goodbye");
}

#[tokio::test]
async fn failures_fall_back_to_original() {
    let (base, _seen) = stub().await;
    for path in ["/status-string", "/http-500", "/not-json"] {
        let t = client(&base, path, 2_000);
        assert_eq!(t.translate("Keep me").await, "Keep me", "path {path}");
    }
}

#[tokio::test]
async fn timeout_falls_back_to_original() {
    let (base, _seen) = stub().await;
    let t = client(&base, "/slow", 200);
    let started = std::time::Instant::now();
    assert_eq!(t.translate("Too slow").await, "Too slow");
    assert!(started.elapsed() < Duration::from_millis(1_200));
}

#[tokio::test]
async fn blank_input_makes_no_call() {
    let (base, seen) = stub().await;
    let t = client(&base, "/capture", 2_000);
    assert_eq!(t.translate(" \t ").await, "");
    assert!(seen.lock().unwrap().is_empty());
}
