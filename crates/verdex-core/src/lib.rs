//! # verdex-core — Verdex Domain Types
//!
//! Foundational types shared across the Verdex stack: law and feature
//! catalog records, human corrections with their review lifecycle, model
//! verdicts with the three-valued compliance status, and the aggregate
//! summary with its risk score.
//!
//! ## Identity Rules
//!
//! Features are identified by name, compared case-insensitively after
//! trimming surrounding whitespace. Laws are identified by exact title
//! match. Corrections carry UUID v4 identifiers assigned at submission.
//!
//! ## Status Coercion
//!
//! `ComplianceStatus` recognizes snake_case, hyphenated, spaced, and
//! camel-cased spellings of its three values. Anything else is not a
//! fourth status: callers coerce unrecognized values to
//! `RequiresReview` so that uncertain output always lands in front of a
//! human.

pub mod correction;
pub mod error;
pub mod feature;
pub mod law;
pub mod verdict;

// Re-export primary types.
pub use correction::{Correction, CorrectionId, CorrectionKind, CorrectionStatus, NewCorrection};
pub use error::{require_text, ValidationError};
pub use feature::Feature;
pub use law::Law;
pub use verdict::{ComplianceStatus, ComplianceSummary, Verdict};
