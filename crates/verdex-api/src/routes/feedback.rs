//! # Feedback Routes
//!
//! Submission, listing, review, and removal of reviewer corrections.
//! Listing filters by feature, law, or the exact pair. Status changes
//! and deletes report whether anything matched instead of failing on a
//! missing id, so review tooling can retry safely.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use verdex_core::{Correction, CorrectionId, CorrectionKind, CorrectionStatus, NewCorrection};

use crate::error::ApiError;
use crate::routes::{extract_json, success, Success};
use crate::state::AppState;

/// Body for `POST /v1/feedback`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SubmitFeedbackRequest {
    /// Feature the feedback is about.
    pub feature_name: String,
    /// Law the feedback is about.
    pub law_title: String,
    /// `correction`, `suggestion`, or `question`.
    #[schema(value_type = String)]
    pub kind: CorrectionKind,
    /// The feedback text.
    pub message: String,
    /// Optional contact handle of the submitter.
    #[serde(default)]
    pub contact: Option<String>,
}

/// Query filters for `GET /v1/feedback`.
#[derive(Debug, Deserialize)]
pub struct FeedbackQuery {
    /// Exact feature name to filter on.
    pub feature: Option<String>,
    /// Exact law title to filter on.
    pub law: Option<String>,
}

/// Body for `PATCH /v1/feedback/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SetStatusRequest {
    /// `pending`, `reviewed`, or `implemented`.
    #[schema(value_type = String)]
    pub status: CorrectionStatus,
}

/// Payload of a successful `GET /v1/feedback`.
#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackListData {
    /// Matching corrections, oldest first.
    #[schema(value_type = Vec<Object>)]
    pub entries: Vec<Correction>,
    /// When the store last changed, if it ever has.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Payload of a successful `PATCH /v1/feedback/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusData {
    /// Whether an entry with that id existed.
    pub updated: bool,
}

/// Payload of a successful `DELETE /v1/feedback/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteData {
    /// Whether an entry with that id existed.
    pub deleted: bool,
}

/// Build the feedback router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/feedback", get(list_feedback).post(submit_feedback))
        .route(
            "/v1/feedback/:id",
            patch(set_status).delete(delete_feedback),
        )
}

/// POST /v1/feedback: submit a correction.
#[utoipa::path(
    post,
    path = "/v1/feedback",
    request_body = SubmitFeedbackRequest,
    responses(
        (status = 200, description = "Enveloped stored correction with id, timestamp, and pending status"),
        (status = 400, description = "Blank required field or unknown kind", body = crate::error::ErrorBody),
    ),
    tag = "feedback"
)]
async fn submit_feedback(
    State(state): State<AppState>,
    body: Result<Json<SubmitFeedbackRequest>, JsonRejection>,
) -> Result<Json<Success<Correction>>, ApiError> {
    let req = extract_json(body)?;
    let new = NewCorrection::new(
        &req.feature_name,
        &req.law_title,
        req.kind,
        &req.message,
        req.contact.as_deref(),
    )?;
    let stored = state.feedback.submit(new)?;
    tracing::info!(id = %stored.id, kind = %stored.kind, "correction submitted");
    Ok(success(stored))
}

/// GET /v1/feedback: list corrections, optionally filtered.
#[utoipa::path(
    get,
    path = "/v1/feedback",
    params(
        ("feature" = Option<String>, Query, description = "Exact feature name filter"),
        ("law" = Option<String>, Query, description = "Exact law title filter"),
    ),
    responses(
        (status = 200, description = "Enveloped correction list with the last-updated timestamp"),
    ),
    tag = "feedback"
)]
async fn list_feedback(
    State(state): State<AppState>,
    Query(query): Query<FeedbackQuery>,
) -> Json<Success<FeedbackListData>> {
    let entries = match (query.feature.as_deref(), query.law.as_deref()) {
        (Some(feature), Some(law)) => state.feedback.for_pair(feature, law),
        (Some(feature), None) => state.feedback.for_feature(feature),
        (None, Some(law)) => state.feedback.for_law(law),
        (None, None) => state.feedback.all(),
    };
    success(FeedbackListData {
        entries,
        last_updated: state.feedback.last_updated(),
    })
}

/// PATCH /v1/feedback/{id}: move a correction through review.
#[utoipa::path(
    patch,
    path = "/v1/feedback/{id}",
    params(("id" = String, Path, description = "Correction identifier")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Enveloped update flag; false when no entry had that id", body = StatusData),
        (status = 400, description = "Invalid id or unknown status", body = crate::error::ErrorBody),
    ),
    tag = "feedback"
)]
async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<SetStatusRequest>, JsonRejection>,
) -> Result<Json<Success<StatusData>>, ApiError> {
    let req = extract_json(body)?;
    let id = CorrectionId::parse(&id)?;
    let updated = state.feedback.set_status(id, req.status)?;
    if updated {
        tracing::info!(%id, status = %req.status, "correction status changed");
    }
    Ok(success(StatusData { updated }))
}

/// DELETE /v1/feedback/{id}: remove a correction.
#[utoipa::path(
    delete,
    path = "/v1/feedback/{id}",
    params(("id" = String, Path, description = "Correction identifier")),
    responses(
        (status = 200, description = "Enveloped delete flag; false when no entry had that id", body = DeleteData),
        (status = 400, description = "Invalid id", body = crate::error::ErrorBody),
    ),
    tag = "feedback"
)]
async fn delete_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Success<DeleteData>>, ApiError> {
    let id = CorrectionId::parse(&id)?;
    let deleted = state.feedback.delete(id)?;
    if deleted {
        tracing::info!(%id, "correction deleted");
    }
    Ok(success(DeleteData { deleted }))
}
