//! Headline relay — binary entrypoint.
//! Boots the Axum HTTP server on Shuttle with shared state and the metrics route.

use news_relay::{api, metrics::Metrics, AppState};
use shuttle_axum::ShuttleAxum;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact local logs, only when NEWS_DEV_LOG=1. Shuttle installs its own subscriber
/// in deployed environments, so a failed `try_init` is expected there.
fn enable_dev_tracing() {
    let dev_flag = std::env::var("NEWS_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");
    if !dev_flag {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("news_relay=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let state = AppState::from_env()?;
    let metrics = Metrics::init()?;

    let router = api::router(state).merge(metrics.router());
    info!("routes: /api/news /api/x-trends /health /metrics");

    Ok(router.into())
}
