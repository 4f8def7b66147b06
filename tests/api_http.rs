// tests/api_http.rs
//
// Router-level checks without any upstream traffic.

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use tower::ServiceExt as _; // for `oneshot`

use news_relay::{api, config::AppConfig, AppState};

fn test_router() -> axum::Router {
    let state = AppState::from_config(&AppConfig::default()).expect("state");
    api::router(state)
}

#[tokio::test]
async fn health_returns_200_and_ok_body() {
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = test_router().oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), 1024).await.expect("read body");
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let req = Request::builder()
        .uri("/api/unknown")
        .body(Body::empty())
        .expect("build request");
    let resp = test_router().oneshot(req).await.expect("oneshot");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/news")
        .header("origin", "https://reader.example")
        .header("access-control-request-method", "GET")
        .body(Body::empty())
        .expect("build preflight");
    let resp = test_router().oneshot(req).await.expect("oneshot");
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key("access-control-allow-origin"));
}
