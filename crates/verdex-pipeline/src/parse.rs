//! # Model Response Parsing
//!
//! Both pipeline stages parse model text through [`ParseOutcome`]:
//! either a typed payload or `Failed` carrying the raw text for logs.
//! There are no sentinel values; a caller that receives `Parsed` has a
//! fully validated payload.
//!
//! ## Leniency Rules
//!
//! Responses are accepted fenced or bare, with prose around the JSON.
//! The verdict object must carry all three expected keys; an
//! unrecognized status value inside an otherwise well-formed object is
//! coerced to `requires_review` rather than failing the parse, because
//! a model that answered with an unexpected label still answered.

use serde_json::Value;

use verdex_core::ComplianceStatus;
use verdex_model::{first_json_array, first_json_object, quoted_strings, strip_code_fences};

const KEY_STATUS: &str = "compliance_status";
const KEY_REASONING: &str = "reasoning";
const KEY_RECOMMENDATIONS: &str = "recommendations";

/// Outcome of parsing one model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    /// The response yielded a valid payload.
    Parsed(T),
    /// The response could not be understood. `raw` is the original
    /// model text, kept for diagnostics.
    Failed {
        /// The unparseable response text.
        raw: String,
    },
}

impl<T> ParseOutcome<T> {
    /// Whether this outcome carries a payload.
    #[must_use]
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    /// The payload, if any.
    #[must_use]
    pub fn parsed(self) -> Option<T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Failed { .. } => None,
        }
    }
}

/// The typed body of a verdict response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictPayload {
    /// Parsed status, already coerced if the model used an unknown
    /// label.
    pub status: ComplianceStatus,
    /// Model reasoning text.
    pub reasoning: String,
    /// Recommendation strings; non-strings in the source array are
    /// dropped.
    pub recommendations: Vec<String>,
}

/// Parse a screening response into law titles.
///
/// Tries, in order: a JSON string array (fence-stripped, greedy
/// bracket slice), then every double-quoted substring in the text.
/// Only when both yield nothing is the outcome `Failed`.
#[must_use]
pub fn parse_title_list(text: &str) -> ParseOutcome<Vec<String>> {
    let cleaned = strip_code_fences(text);

    if let Some(slice) = first_json_array(cleaned) {
        if let Ok(titles) = serde_json::from_str::<Vec<String>>(slice) {
            let titles: Vec<String> = titles
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            return ParseOutcome::Parsed(titles);
        }
    }

    let quoted = quoted_strings(cleaned);
    if !quoted.is_empty() {
        return ParseOutcome::Parsed(quoted);
    }

    ParseOutcome::Failed {
        raw: text.to_string(),
    }
}

/// Parse an evaluation response into a [`VerdictPayload`].
///
/// The greedy object slice must parse as a JSON object carrying
/// `compliance_status`, `reasoning`, and `recommendations`. Status
/// values outside the three known labels coerce to `requires_review`;
/// a missing key fails the parse instead, because it means the model
/// ignored the output contract entirely.
#[must_use]
pub fn parse_verdict_payload(text: &str) -> ParseOutcome<VerdictPayload> {
    let failed = || ParseOutcome::Failed {
        raw: text.to_string(),
    };

    let cleaned = strip_code_fences(text);
    let Some(slice) = first_json_object(cleaned) else {
        return failed();
    };
    let Ok(value) = serde_json::from_str::<Value>(slice) else {
        return failed();
    };
    let Some(object) = value.as_object() else {
        return failed();
    };
    let (Some(status_value), Some(reasoning_value), Some(recommendations_value)) = (
        object.get(KEY_STATUS),
        object.get(KEY_REASONING),
        object.get(KEY_RECOMMENDATIONS),
    ) else {
        return failed();
    };

    let status = status_value
        .as_str()
        .and_then(ComplianceStatus::parse_lenient)
        .unwrap_or_else(|| {
            tracing::warn!(
                status = %status_value,
                "unrecognized compliance status, coercing to requires_review"
            );
            ComplianceStatus::RequiresReview
        });

    let reasoning = match reasoning_value {
        Value::String(text) => text.trim().to_string(),
        other => other.to_string(),
    };

    let recommendations = match recommendations_value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(single) if !single.trim().is_empty() => {
            vec![single.trim().to_string()]
        }
        _ => Vec::new(),
    };

    ParseOutcome::Parsed(VerdictPayload {
        status,
        reasoning,
        recommendations,
    })
}
