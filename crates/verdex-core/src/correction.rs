//! # Human Corrections
//!
//! A correction is reviewer feedback about one (feature, law) pair. Three
//! kinds exist: a `correction` disputes a verdict, a `suggestion`
//! proposes an improvement, a `question` asks for clarification. Each
//! entry moves through a review lifecycle (`pending` → `reviewed` →
//! `implemented`); only entries of kind `correction` that have reached
//! `implemented` are injected into later evaluation prompts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{require_text, ValidationError};

// ---------------------------------------------------------------------------
// Identifier
// ---------------------------------------------------------------------------

/// Unique identifier of a correction, assigned at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrectionId(Uuid);

impl CorrectionId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its canonical string form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidId`] when the input is not a
    /// valid UUID.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| ValidationError::InvalidId {
                value: value.to_string(),
            })
    }
}

impl fmt::Display for CorrectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Kind and status
// ---------------------------------------------------------------------------

/// What kind of feedback a submission is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionKind {
    /// Disputes or amends a verdict. The only kind that feeds prompts.
    Correction,
    /// Proposes an improvement without disputing a verdict.
    Suggestion,
    /// Asks for clarification.
    Question,
}

impl CorrectionKind {
    /// Canonical snake_case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correction => "correction",
            Self::Suggestion => "suggestion",
            Self::Question => "question",
        }
    }
}

impl fmt::Display for CorrectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrectionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "correction" => Ok(Self::Correction),
            "suggestion" => Ok(Self::Suggestion),
            "question" => Ok(Self::Question),
            _ => Err(ValidationError::UnknownKind {
                value: s.to_string(),
            }),
        }
    }
}

/// Review state of a correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionStatus {
    /// Submitted, not yet looked at.
    Pending,
    /// A human has looked at it.
    Reviewed,
    /// Accepted and applied. Implemented corrections feed prompts.
    Implemented,
}

impl CorrectionStatus {
    /// Canonical snake_case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Implemented => "implemented",
        }
    }
}

impl fmt::Display for CorrectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrectionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "reviewed" => Ok(Self::Reviewed),
            "implemented" => Ok(Self::Implemented),
            _ => Err(ValidationError::UnknownStatus {
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Submission payload and stored record
// ---------------------------------------------------------------------------

/// A validated submission, before id/timestamp/status assignment.
///
/// Construction is the validation boundary: a `NewCorrection` that
/// exists is well-formed, so downstream code never re-checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCorrection {
    /// Feature the feedback is about (exact pair key, stored as given).
    pub feature_name: String,
    /// Law the feedback is about.
    pub law_title: String,
    /// Kind of feedback.
    pub kind: CorrectionKind,
    /// The feedback text itself.
    pub message: String,
    /// Optional contact handle of the submitter.
    pub contact: Option<String>,
}

impl NewCorrection {
    /// Validate a submission: feature, law, and message must be
    /// non-blank; contact is kept only when non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] naming the first blank
    /// required field.
    pub fn new(
        feature_name: &str,
        law_title: &str,
        kind: CorrectionKind,
        message: &str,
        contact: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let feature_name = require_text("feature", feature_name)?;
        let law_title = require_text("law", law_title)?;
        let message = require_text("message", message)?;
        let contact = contact
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Ok(Self {
            feature_name,
            law_title,
            kind,
            message,
            contact,
        })
    }
}

/// A stored correction record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    /// Unique identifier.
    pub id: CorrectionId,
    /// Feature side of the pair key.
    pub feature_name: String,
    /// Law side of the pair key.
    pub law_title: String,
    /// Kind of feedback.
    pub kind: CorrectionKind,
    /// The feedback text.
    pub message: String,
    /// Optional contact handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Review state.
    pub status: CorrectionStatus,
}

impl Correction {
    /// Turn a validated submission into a stored record: fresh id,
    /// `created_at = now`, status `pending`.
    #[must_use]
    pub fn from_submission(new: NewCorrection) -> Self {
        Self {
            id: CorrectionId::generate(),
            feature_name: new.feature_name,
            law_title: new.law_title,
            kind: new.kind,
            message: new.message,
            contact: new.contact,
            created_at: Utc::now(),
            status: CorrectionStatus::Pending,
        }
    }

    /// Whether this record is about the given (feature, law) pair.
    /// Exact match on both sides, the same rule `implemented_for` uses.
    #[must_use]
    pub fn is_for_pair(&self, feature_name: &str, law_title: &str) -> bool {
        self.feature_name == feature_name && self.law_title == law_title
    }
}
