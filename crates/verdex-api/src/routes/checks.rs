//! # Check Routes
//!
//! The two screening entry points. Batch checks run the evaluation grid
//! over named (or all) catalog rows; feature checks screen an ad-hoc
//! feature against the law table first and evaluate only the relevant
//! laws. Both refuse to run until the catalog is loaded, and both
//! return a report rather than an error when the model misbehaves: the
//! pipeline absorbs model failures as `requires_review` verdicts.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use verdex_core::{require_text, Feature};
use verdex_pipeline::{BatchReport, DiscoveryReport, EvaluationOptions};

use crate::error::ApiError;
use crate::routes::{extract_json, success, Success};
use crate::state::AppState;

/// Body for `POST /v1/checks`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct BatchCheckRequest {
    /// Feature names to check; omit for the whole feature table.
    #[serde(default)]
    pub features: Option<Vec<String>>,
    /// Law titles to check against; omit for the whole law table.
    #[serde(default)]
    pub laws: Option<Vec<String>>,
    /// Whether implemented corrections feed the prompts. Defaults on.
    #[serde(default)]
    pub include_corrections: Option<bool>,
}

/// Body for `POST /v1/checks/feature`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct FeatureCheckRequest {
    /// Name of the feature under screening. Need not exist in the
    /// catalog.
    pub name: String,
    /// What the feature does.
    pub description: String,
    /// Whether implemented corrections feed the prompts. Defaults on.
    #[serde(default)]
    pub include_corrections: Option<bool>,
}

/// Build the checks router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/checks", post(batch_check))
        .route("/v1/checks/feature", post(feature_check))
}

fn ensure_ready(state: &AppState) -> Result<(), ApiError> {
    if state.catalog.is_ready() {
        Ok(())
    } else {
        Err(ApiError::NotReady("catalog tables are still loading".into()))
    }
}

fn options_from(include_corrections: Option<bool>) -> EvaluationOptions {
    EvaluationOptions {
        include_corrections: include_corrections.unwrap_or(true),
    }
}

/// POST /v1/checks: evaluate a feature/law grid from the catalog.
#[utoipa::path(
    post,
    path = "/v1/checks",
    request_body = BatchCheckRequest,
    responses(
        (status = 200, description = "Enveloped batch report with verdicts and summary"),
        (status = 400, description = "Malformed request body", body = crate::error::ErrorBody),
        (status = 503, description = "Catalog tables not loaded", body = crate::error::ErrorBody),
    ),
    tag = "checks"
)]
async fn batch_check(
    State(state): State<AppState>,
    body: Result<Json<BatchCheckRequest>, JsonRejection>,
) -> Result<Json<Success<BatchReport>>, ApiError> {
    let req = extract_json(body)?;
    ensure_ready(&state)?;
    let report = state
        .engine
        .check_batch(req.laws, req.features, options_from(req.include_corrections))
        .await;
    Ok(success(report))
}

/// POST /v1/checks/feature: screen an ad-hoc feature, then evaluate it
/// against the laws the screening found relevant.
#[utoipa::path(
    post,
    path = "/v1/checks/feature",
    request_body = FeatureCheckRequest,
    responses(
        (status = 200, description = "Enveloped discovery report"),
        (status = 400, description = "Blank name or description", body = crate::error::ErrorBody),
        (status = 503, description = "Catalog tables not loaded", body = crate::error::ErrorBody),
    ),
    tag = "checks"
)]
async fn feature_check(
    State(state): State<AppState>,
    body: Result<Json<FeatureCheckRequest>, JsonRejection>,
) -> Result<Json<Success<DiscoveryReport>>, ApiError> {
    let req = extract_json(body)?;
    ensure_ready(&state)?;

    // Ad-hoc features are never written to the catalog file, so only
    // the blank-field rule applies, not the quote rule.
    let feature = Feature {
        name: require_text("name", &req.name)?,
        description: require_text("description", &req.description)?,
    };

    let report = state
        .engine
        .check_feature(&feature, options_from(req.include_corrections))
        .await;
    Ok(success(report))
}
