//! # Catalog Routes
//!
//! Read access to the law and feature tables, the append-feature
//! operation, and the explicit table refresh. Listings serve whatever
//! snapshot is loaded, including the empty one; mutation and refresh
//! report their failures through the error envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use verdex_core::{Feature, Law};

use crate::error::ApiError;
use crate::routes::{extract_json, success, Success};
use crate::state::AppState;

/// Body for `POST /v1/features`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AppendFeatureRequest {
    /// Feature name, unique case-insensitively.
    pub name: String,
    /// What the feature does.
    pub description: String,
}

/// Payload of a successful `POST /v1/refresh`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshData {
    /// Laws loaded by the refresh.
    pub laws: usize,
    /// Features loaded by the refresh.
    pub features: usize,
}

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/laws", get(list_laws))
        .route("/v1/features", get(list_features).post(append_feature))
        .route("/v1/refresh", post(refresh))
}

/// GET /v1/laws: current law snapshot.
#[utoipa::path(
    get,
    path = "/v1/laws",
    responses(
        (status = 200, description = "Enveloped array of laws"),
    ),
    tag = "catalog"
)]
async fn list_laws(State(state): State<AppState>) -> Json<Success<Vec<Law>>> {
    success(state.catalog.laws())
}

/// GET /v1/features: current feature snapshot.
#[utoipa::path(
    get,
    path = "/v1/features",
    responses(
        (status = 200, description = "Enveloped array of features"),
    ),
    tag = "catalog"
)]
async fn list_features(State(state): State<AppState>) -> Json<Success<Vec<Feature>>> {
    success(state.catalog.features())
}

/// POST /v1/features: append a feature to the catalog.
#[utoipa::path(
    post,
    path = "/v1/features",
    request_body = AppendFeatureRequest,
    responses(
        (status = 200, description = "Enveloped created feature"),
        (status = 400, description = "Blank field, quote in a field, or duplicate name", body = crate::error::ErrorBody),
        (status = 503, description = "Feature table not loaded", body = crate::error::ErrorBody),
    ),
    tag = "catalog"
)]
async fn append_feature(
    State(state): State<AppState>,
    body: Result<Json<AppendFeatureRequest>, JsonRejection>,
) -> Result<Json<Success<Feature>>, ApiError> {
    let req = extract_json(body)?;
    let feature = state.catalog.append_feature(&req.name, &req.description)?;
    tracing::info!(name = %feature.name, "feature appended via API");
    Ok(success(feature))
}

/// POST /v1/refresh: re-read both catalog tables from disk.
#[utoipa::path(
    post,
    path = "/v1/refresh",
    responses(
        (status = 200, description = "Enveloped row counts after the refresh", body = RefreshData),
        (status = 500, description = "A table could not be read; the previous snapshot stays", body = crate::error::ErrorBody),
    ),
    tag = "catalog"
)]
async fn refresh(State(state): State<AppState>) -> Result<Json<Success<RefreshData>>, ApiError> {
    let (laws, features) = state.catalog.reload()?;
    Ok(success(RefreshData { laws, features }))
}
