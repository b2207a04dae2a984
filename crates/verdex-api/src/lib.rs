//! # verdex-api — Axum API Service for Verdex
//!
//! HTTP surface over the Verdex compliance pipeline: catalog access,
//! batch and single-feature checks, and the reviewer feedback loop.
//!
//! ## API Surface
//!
//! | Prefix                 | Module               | Domain                  |
//! |------------------------|----------------------|-------------------------|
//! | `/v1/laws`             | [`routes::catalog`]  | Law table               |
//! | `/v1/features`         | [`routes::catalog`]  | Feature table, append   |
//! | `/v1/refresh`          | [`routes::catalog`]  | Table reload            |
//! | `/v1/checks`           | [`routes::checks`]   | Batch evaluation        |
//! | `/v1/checks/feature`   | [`routes::checks`]   | Single-feature discovery|
//! | `/v1/feedback`         | [`routes::feedback`] | Corrections             |
//! | `/health/*`, `/metrics`| this module          | Probes and scrape       |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Auto-generated spec via utoipa derive macros at `/openapi.json`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

#[cfg(test)]
mod testing;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Check if metrics are enabled via the `VERDEX_METRICS_ENABLED` env var.
/// Defaults to `true` when the variable is absent or set to anything other
/// than `"false"`.
fn metrics_enabled() -> bool {
    std::env::var("VERDEX_METRICS_ENABLED")
        .map(|v| v.to_lowercase() != "false")
        .unwrap_or(true)
}

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) and `/metrics` sit outside the metrics
/// middleware so scrapes and probes never count themselves.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();
    let metrics_on = metrics_enabled();

    // Body size limit: 2 MiB. Check and feedback bodies are short; a
    // larger payload is a caller bug, not a use case.
    let mut api = Router::new()
        .merge(routes::catalog::router())
        .merge(routes::checks::router())
        .merge(routes::feedback::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024));

    // Only register the metrics middleware when metrics are enabled.
    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics.clone()));
    }

    let api = api
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let mut probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    // Mount /metrics when metrics are enabled, next to the health probes.
    if metrics_on {
        probes = probes
            .route("/metrics", axum::routing::get(prometheus_metrics))
            .layer(Extension(metrics));
    }

    let probes = probes.with_state(state);

    Router::new().merge(probes).merge(api)
}

/// GET /metrics: Prometheus scrape endpoint.
///
/// Updates domain gauges from current `AppState` on each scrape (pull
/// model), then gathers and encodes all metrics in Prometheus text
/// exposition format.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    metrics.catalog_laws().set(state.catalog.law_count() as f64);
    metrics
        .catalog_features()
        .set(state.catalog.feature_count() as f64);
    metrics
        .catalog_ready()
        .set(if state.catalog.is_ready() { 1.0 } else { 0.0 });
    metrics
        .feedback_entries()
        .set(state.feedback.entry_count() as f64);

    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe. Always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. 200 "ready" once both catalog tables are loaded,
/// 503 "loading" before that.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.catalog.is_ready() {
        (StatusCode::OK, "ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "loading").into_response()
    }
}
