//! # Prompt Construction
//!
//! One place builds every model request, so the output contracts the
//! parsers rely on are stated exactly once. Sampling is pinned low and
//! token budgets are bounded: verdicts should be as repeatable as the
//! model allows, and a runaway completion is a cost bug.

use std::fmt::Write;

use verdex_core::{Correction, Feature, Law};
use verdex_model::CompletionRequest;

/// Sampling temperature for both pipeline stages.
pub const TEMPERATURE: f32 = 0.1;
/// Token budget for a screening response (a bare title array).
pub const SCREENING_MAX_TOKENS: u32 = 512;
/// Token budget for an evaluation response (one verdict object).
pub const EVALUATION_MAX_TOKENS: u32 = 1024;

const SCREENING_SYSTEM: &str = "You screen product features against a regulatory catalog. \
A law is relevant only if the feature's functionality could plausibly interact with it or \
need to comply with it. Respond with a JSON array of law titles copied exactly from the \
catalog, and nothing else. Respond with [] if no law is relevant.";

const EVALUATION_SYSTEM: &str = "You are a compliance analyst. Assess whether the product \
feature complies with the law. Respond with a single JSON object with exactly these keys: \
\"compliance_status\" (one of \"compliant\", \"non_compliant\", \"requires_review\"), \
\"reasoning\" (a string), and \"recommendations\" (an array of strings). No other text.";

/// Build the screening request for one feature over the whole catalog.
#[must_use]
pub fn screening_request(feature: &Feature, laws: &[Law]) -> CompletionRequest {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "Feature: {}", feature.name);
    let _ = writeln!(prompt, "Feature description: {}", feature.description);
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Regulatory catalog:");
    for law in laws {
        let _ = writeln!(prompt, "- {}: {}", law.title, law.description);
    }
    let _ = write!(
        prompt,
        "\nReturn a JSON array with the exact titles of the laws relevant to this feature."
    );

    CompletionRequest {
        system: SCREENING_SYSTEM.to_string(),
        prompt,
        temperature: TEMPERATURE,
        max_tokens: SCREENING_MAX_TOKENS,
    }
}

/// Build the evaluation request for one (feature, law) pair, with the
/// implemented corrections for that pair, if any, appended as reviewer
/// guidance.
#[must_use]
pub fn evaluation_request(
    feature: &Feature,
    law: &Law,
    corrections: &[Correction],
) -> CompletionRequest {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "Law: {}", law.title);
    let _ = writeln!(prompt, "Jurisdiction: {}", law.jurisdiction);
    let _ = writeln!(prompt, "Law description: {}", law.description);
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Feature: {}", feature.name);
    let _ = writeln!(prompt, "Feature description: {}", feature.description);

    if !corrections.is_empty() {
        let _ = writeln!(prompt);
        let _ = writeln!(
            prompt,
            "Reviewer guidance from previously implemented corrections:"
        );
        for correction in corrections {
            let _ = writeln!(prompt, "- {}", correction.message);
        }
    }

    let _ = write!(
        prompt,
        "\nAssess compliance of this feature with this law and respond with the JSON object."
    );

    CompletionRequest {
        system: EVALUATION_SYSTEM.to_string(),
        prompt,
        temperature: TEMPERATURE,
        max_tokens: EVALUATION_MAX_TOKENS,
    }
}
