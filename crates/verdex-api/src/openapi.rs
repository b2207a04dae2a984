//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
///
/// Registers all utoipa-documented routes, schemas, and tags. Serves as
/// the single source of truth for integrators.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Verdex API",
        version = "0.3.2",
        description = "Compliance screening service for product features against a regulation catalog.\n\nProvides:\n- **Catalog** access: law and feature tables loaded from delimited files, with append and refresh\n- **Checks**: batch evaluation over the full feature/law grid or a named subset, and single-feature discovery that screens the law table for relevance before evaluating\n- **Feedback**: reviewer corrections with a review lifecycle (`pending` → `reviewed` → `implemented`); implemented corrections feed later evaluation prompts\n\nEvery successful response is `{\"success\": true, \"data\": ...}`; every failure is `{\"success\": false, \"error\": ...}`. Model failures never surface as HTTP errors: affected pairs come back as `requires_review` verdicts inside the report.",
        license(name = "AGPL-3.0-or-later"),
        contact(name = "Verdex", url = "https://github.com/verdex-labs/verdex")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // ── Catalog ──────────────────────────────────────────────────────
        crate::routes::catalog::list_laws,
        crate::routes::catalog::list_features,
        crate::routes::catalog::append_feature,
        crate::routes::catalog::refresh,
        // ── Checks ───────────────────────────────────────────────────────
        crate::routes::checks::batch_check,
        crate::routes::checks::feature_check,
        // ── Feedback ─────────────────────────────────────────────────────
        crate::routes::feedback::submit_feedback,
        crate::routes::feedback::list_feedback,
        crate::routes::feedback::set_status,
        crate::routes::feedback::delete_feedback,
    ),
    components(
        schemas(
            // ── Error types ─────────────────────────────────────────────
            crate::error::ErrorBody,
            // ── Catalog DTOs ────────────────────────────────────────────
            crate::routes::catalog::AppendFeatureRequest,
            crate::routes::catalog::RefreshData,
            // ── Check DTOs ──────────────────────────────────────────────
            crate::routes::checks::BatchCheckRequest,
            crate::routes::checks::FeatureCheckRequest,
            // ── Feedback DTOs ───────────────────────────────────────────
            crate::routes::feedback::SubmitFeedbackRequest,
            crate::routes::feedback::SetStatusRequest,
            crate::routes::feedback::FeedbackListData,
            crate::routes::feedback::StatusData,
            crate::routes::feedback::DeleteData,
        ),
    ),
    tags(
        (name = "catalog", description = "Law and feature tables — listing, append, refresh"),
        (name = "checks", description = "Batch and single-feature compliance checks"),
        (name = "feedback", description = "Reviewer corrections and their review lifecycle"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
