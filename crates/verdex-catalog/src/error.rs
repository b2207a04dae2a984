//! # Catalog Errors

use std::path::PathBuf;

use thiserror::Error;

use verdex_core::ValidationError;

/// Failures surfaced by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading or writing a catalog file failed.
    #[error("catalog io on {path}: {source}")]
    Io {
        /// File the operation touched.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A feature with the same name (case-insensitive) already exists.
    #[error("feature already exists: {name}")]
    DuplicateFeature {
        /// The existing catalog name.
        name: String,
    },

    /// The table has not loaded successfully, so mutation is refused to
    /// avoid clobbering a file the store could not read.
    #[error("{table} table is not loaded")]
    NotReady {
        /// Which table refused the operation.
        table: &'static str,
    },

    /// Input failed domain validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
