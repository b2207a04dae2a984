//! # Model Client Errors
//!
//! One taxonomy for every way a completion can fail. The pipeline maps
//! all of these to its own fallback behavior; the variants exist so
//! logs say which failure actually happened.

use thiserror::Error;

/// Failures surfaced by a [`crate::ModelClient`].
#[derive(Debug, Error)]
pub enum ModelError {
    /// The client could not be built from its configuration.
    #[error("model client configuration invalid: {reason}")]
    Config {
        /// What was wrong.
        reason: String,
    },

    /// The request exceeded the client-side timeout.
    #[error("model request timed out after {limit_secs}s")]
    Timeout {
        /// The configured limit.
        limit_secs: u64,
    },

    /// The model service could not be reached or answered 5xx.
    #[error("model service unavailable: {reason}")]
    Unavailable {
        /// Transport error or upstream status with body excerpt.
        reason: String,
    },

    /// The model service answered with a non-5xx error status.
    #[error("model rejected the request: HTTP {status}: {detail}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body excerpt.
        detail: String,
    },

    /// The response arrived but did not have the expected shape.
    #[error("model response malformed: {reason}")]
    Malformed {
        /// What failed to parse.
        reason: String,
    },

    /// The response parsed but carried no completion text.
    #[error("model returned an empty completion")]
    Empty,
}
