//! # Shared Application State
//!
//! Everything handlers need, constructed once in `main` and cloned per
//! request. All components are `Arc`-held; cloning the state is cheap.

use std::sync::Arc;

use verdex_catalog::CatalogStore;
use verdex_feedback::FeedbackStore;
use verdex_pipeline::CheckEngine;

use crate::config::ApiConfig;

/// Injected dependencies for the API layer.
#[derive(Clone)]
pub struct AppState {
    /// Startup configuration.
    pub config: Arc<ApiConfig>,
    /// Law and feature catalog.
    pub catalog: Arc<CatalogStore>,
    /// Correction store.
    pub feedback: Arc<FeedbackStore>,
    /// Screening and evaluation pipeline.
    pub engine: Arc<CheckEngine>,
}

impl AppState {
    /// Assemble the state from its components.
    pub fn new(
        config: ApiConfig,
        catalog: Arc<CatalogStore>,
        feedback: Arc<FeedbackStore>,
        engine: Arc<CheckEngine>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
            feedback,
            engine,
        }
    }
}
