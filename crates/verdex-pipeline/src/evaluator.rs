//! # Pair Evaluator
//!
//! One model call per (feature, law) pair, exactly one attempt, and no
//! error path outward: whatever goes wrong, the caller gets a verdict.
//! A failed call or an unparseable answer becomes the fixed
//! `requires_review` fallback, so a flaky model degrades a report into
//! "needs a human" instead of crashing the batch that contains it.

use std::sync::Arc;

use verdex_core::{Correction, Feature, Law, Verdict};
use verdex_model::ModelClient;

use crate::parse::{parse_verdict_payload, ParseOutcome};
use crate::prompt::evaluation_request;

/// Evaluates single (feature, law) pairs.
pub struct PairEvaluator {
    client: Arc<dyn ModelClient>,
}

impl PairEvaluator {
    /// Wrap a model client.
    #[must_use]
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    /// Evaluate one pair. `corrections` is the implemented-correction
    /// feed for exactly this pair; pass an empty slice to evaluate
    /// without reviewer guidance.
    ///
    /// This method is total: every failure is logged and absorbed into
    /// [`Verdict::fallback`].
    pub async fn evaluate(
        &self,
        feature: &Feature,
        law: &Law,
        corrections: &[Correction],
    ) -> Verdict {
        let request = evaluation_request(feature, law, corrections);

        let text = match self.client.complete(&request).await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(
                    feature = %feature.name,
                    law = %law.title,
                    model = %self.client.client_name(),
                    %error,
                    "evaluation call failed, emitting fallback verdict"
                );
                return Verdict::fallback(&feature.name, law);
            }
        };

        match parse_verdict_payload(&text) {
            ParseOutcome::Parsed(payload) => {
                tracing::debug!(
                    feature = %feature.name,
                    law = %law.title,
                    status = %payload.status,
                    "pair evaluated"
                );
                Verdict {
                    feature_name: feature.name.clone(),
                    law_title: law.title.clone(),
                    law_description: law.description.clone(),
                    status: payload.status,
                    reasoning: payload.reasoning,
                    recommendations: payload.recommendations,
                }
            }
            ParseOutcome::Failed { raw } => {
                tracing::warn!(
                    feature = %feature.name,
                    law = %law.title,
                    raw = %excerpt(&raw),
                    "unparseable evaluation response, emitting fallback verdict"
                );
                Verdict::fallback(&feature.name, law)
            }
        }
    }
}

fn excerpt(text: &str) -> String {
    const LIMIT: usize = 160;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        let cut: String = text.chars().take(LIMIT).collect();
        format!("{cut}...")
    }
}
