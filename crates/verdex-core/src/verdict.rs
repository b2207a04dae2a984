//! # Verdicts and the Compliance Status
//!
//! A verdict is the outcome of evaluating one (feature, law) pair. The
//! status is strictly three-valued:
//!
//! - `compliant` — the feature as described does not conflict with the law
//! - `non_compliant` — the feature conflicts with the law
//! - `requires_review` — the model could not decide, or its answer could
//!   not be trusted
//!
//! There is no fourth value. Model output that names anything else is
//! coerced to `requires_review`, so uncertainty always lands in front of
//! a human instead of silently passing.
//!
//! ## Risk Score
//!
//! A batch of verdicts aggregates into a [`ComplianceSummary`] whose risk
//! score is the flagged share of the batch on a 0..=100 scale:
//! `round(100 * (non_compliant + requires_review) / total)`, defined as 0
//! for an empty batch.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::law::Law;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Three-valued outcome of a single pair evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    /// No conflict found.
    Compliant,
    /// The feature conflicts with the law.
    NonCompliant,
    /// Undecided or untrusted output. Needs a human.
    RequiresReview,
}

impl ComplianceStatus {
    /// Canonical snake_case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::NonCompliant => "non_compliant",
            Self::RequiresReview => "requires_review",
        }
    }

    /// Whether this status blocks a clean report. `non_compliant` and
    /// `requires_review` both count toward the risk score.
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        !matches!(self, Self::Compliant)
    }

    /// Parse a status as models actually write it.
    ///
    /// Accepts the canonical snake_case names plus hyphenated, spaced,
    /// and camel-cased spellings, case-insensitively (`NON-COMPLIANT`,
    /// `Requires Review`, `nonCompliant`). `needs_review` is accepted as
    /// an alias seen in the wild. Returns `None` for anything else;
    /// callers on the evaluation path coerce `None` to
    /// [`ComplianceStatus::RequiresReview`].
    #[must_use]
    pub fn parse_lenient(value: &str) -> Option<Self> {
        let folded: String = value
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase();
        match folded.as_str() {
            "compliant" => Some(Self::Compliant),
            "noncompliant" => Some(Self::NonCompliant),
            "requiresreview" | "needsreview" => Some(Self::RequiresReview),
            _ => None,
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Outcome of evaluating one (feature, law) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Feature side of the pair.
    pub feature_name: String,
    /// Law side of the pair (exact catalog title).
    pub law_title: String,
    /// Law description, echoed so reports read standalone.
    pub law_description: String,
    /// The three-valued outcome.
    pub status: ComplianceStatus,
    /// Model reasoning, or the fallback explanation.
    pub reasoning: String,
    /// Suggested follow-ups. May be empty.
    pub recommendations: Vec<String>,
}

impl Verdict {
    /// The fixed verdict used when evaluation fails for any reason
    /// (model error, malformed response). The pipeline never propagates
    /// such failures; it emits this instead.
    #[must_use]
    pub fn fallback(feature_name: &str, law: &Law) -> Self {
        Self {
            feature_name: feature_name.to_string(),
            law_title: law.title.clone(),
            law_description: law.description.clone(),
            status: ComplianceStatus::RequiresReview,
            reasoning: "An error occurred during automated evaluation; manual review is required."
                .to_string(),
            recommendations: vec![
                "Retry the evaluation once the model service is available.".to_string(),
                "Have a compliance reviewer assess this feature and law pair manually."
                    .to_string(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Aggregate tally over a batch of verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    /// Number of verdicts in the batch.
    pub total: usize,
    /// Verdicts with status `compliant`.
    pub compliant: usize,
    /// Verdicts with status `non_compliant`.
    pub non_compliant: usize,
    /// Verdicts with status `requires_review`.
    pub requires_review: usize,
    /// Flagged share of the batch, 0..=100.
    pub risk_score: u8,
}

impl ComplianceSummary {
    /// Tally a batch of verdicts.
    #[must_use]
    pub fn from_verdicts(verdicts: &[Verdict]) -> Self {
        let mut compliant = 0usize;
        let mut non_compliant = 0usize;
        let mut requires_review = 0usize;
        for verdict in verdicts {
            match verdict.status {
                ComplianceStatus::Compliant => compliant += 1,
                ComplianceStatus::NonCompliant => non_compliant += 1,
                ComplianceStatus::RequiresReview => requires_review += 1,
            }
        }
        let total = verdicts.len();
        Self {
            total,
            compliant,
            non_compliant,
            requires_review,
            risk_score: risk_score(non_compliant + requires_review, total),
        }
    }
}

/// `round(100 * flagged / total)`, 0 for an empty batch.
fn risk_score(flagged: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    {
        (100.0 * flagged as f64 / total as f64).round() as u8
    }
}
