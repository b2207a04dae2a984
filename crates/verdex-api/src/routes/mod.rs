//! # API Route Modules
//!
//! - `catalog` — law/feature listings, feature append, table refresh.
//! - `checks` — batch and single-feature discovery compliance checks.
//! - `feedback` — correction submission, listing, status updates,
//!   deletion.
//!
//! Every successful response wraps its payload as
//! `{"success": true, "data": ...}`; failures become
//! [`crate::error::ApiError`] and serialize as
//! `{"success": false, "error": ...}`.

pub mod catalog;
pub mod checks;
pub mod feedback;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;

use crate::error::ApiError;

/// Uniform success envelope.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    /// Always `true`.
    pub success: bool,
    /// Operation payload.
    pub data: T,
}

/// Wrap a payload in the success envelope.
pub fn success<T: Serialize>(data: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        data,
    })
}

/// Unwrap an extracted JSON body, turning axum's rejection into the 400
/// envelope instead of axum's plain-text default.
pub(crate) fn extract_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}
