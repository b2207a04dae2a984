//! # API Error Type
//!
//! Structured error implementing `axum::response::IntoResponse`. Every
//! failure leaves the API as `{"success": false, "error": <message>}`
//! with a status reflecting the cause: 400 for caller input, 404 for
//! missed lookups, 503 while the catalog is loading, 500 for the rest.
//! Internal detail is logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use verdex_catalog::CatalogError;
use verdex_core::ValidationError;
use verdex_feedback::FeedbackError;

/// JSON body of every failed response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Human-readable message.
    pub error: String,
}

/// Application-level error mapped to HTTP statuses.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Lookup missed (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller input failed validation (400).
    #[error("invalid request: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Catalog tables are not loaded (503).
    #[error("not ready: {0}")]
    NotReady(String),

    /// Everything else (500). The message is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            Self::Internal(_) => "an internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::NotReady(_) => tracing::warn!(error = %self, "request before catalog ready"),
            _ => {}
        }

        let body = ErrorBody {
            success: false,
            error: message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match &err {
            CatalogError::Validation(_) | CatalogError::DuplicateFeature { .. } => {
                Self::Validation(err.to_string())
            }
            CatalogError::NotReady { .. } => Self::NotReady(err.to_string()),
            CatalogError::Io { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl From<FeedbackError> for ApiError {
    fn from(err: FeedbackError) -> Self {
        Self::Internal(err.to_string())
    }
}
