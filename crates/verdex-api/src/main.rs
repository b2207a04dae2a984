//! # verdex-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the Verdex API.
//! Binds to a configurable address (default 0.0.0.0:8080).

use std::sync::Arc;

use anyhow::Context;

use verdex_api::config::ApiConfig;
use verdex_api::state::AppState;
use verdex_catalog::CatalogStore;
use verdex_feedback::FeedbackStore;
use verdex_model::{HttpModelClient, ModelClient, ModelConfig};
use verdex_pipeline::CheckEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ApiConfig::from_env().context("reading configuration")?;

    // The catalog loads soft: a missing table logs, leaves the store
    // not ready, and the server starts anyway. /v1/refresh can pick the
    // tables up later without a restart.
    let catalog = Arc::new(CatalogStore::load(
        &config.laws_path,
        &config.features_path,
        config.delimiter,
    ));
    tracing::info!(
        laws = catalog.law_count(),
        features = catalog.feature_count(),
        ready = catalog.is_ready(),
        "catalog loaded"
    );

    let feedback = Arc::new(FeedbackStore::open(&config.feedback_path).with_context(|| {
        format!(
            "opening feedback store at {}",
            config.feedback_path.display()
        )
    })?);
    tracing::info!(entries = feedback.entry_count(), "feedback store open");

    // The model client is required: every check endpoint needs it.
    let model_config = ModelConfig::from_env().map_err(|e| {
        tracing::error!("model configuration incomplete: {e}");
        e
    })?;
    let client = Arc::new(HttpModelClient::new(model_config)?);
    tracing::info!(model = client.client_name(), "model client configured");

    let engine = Arc::new(CheckEngine::new(
        Arc::clone(&catalog),
        Arc::clone(&feedback),
        client,
    ));

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config, catalog, feedback, engine);
    let app = verdex_api::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!("Verdex API listening on {bind_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize structured tracing: `RUST_LOG` controls the filter,
/// `VERDEX_LOG_JSON=true` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json = std::env::var("VERDEX_LOG_JSON")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
