//! # Feedback Store Errors

use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the correction store.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// Reading, writing, or renaming the backing file failed.
    #[error("feedback io on {path}: {source}")]
    Io {
        /// File the operation touched.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but does not hold a valid feedback
    /// document. The operator must repair or remove it; starting empty
    /// would silently discard review history.
    #[error("feedback file {path} holds malformed JSON: {source}")]
    Malformed {
        /// The offending file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Encoding the document for persistence failed.
    #[error("failed to encode feedback document: {source}")]
    Encode {
        /// Underlying serializer error.
        #[source]
        source: serde_json::Error,
    },
}
