//! # Relevance Screener
//!
//! One model call reduces the catalog to the laws worth evaluating for
//! a feature. The two failure modes are deliberately asymmetric:
//!
//! - a **model failure** fails open and keeps every catalog law in
//!   scope, because skipping evaluation on a transport hiccup would
//!   silently under-report risk;
//! - an **unparseable answer** fails closed and yields no laws, because
//!   the model did respond and inventing relevance on its behalf has no
//!   basis.

use std::sync::Arc;

use verdex_core::{Feature, Law};
use verdex_model::ModelClient;

use crate::parse::{parse_title_list, ParseOutcome};
use crate::prompt::screening_request;

/// Screens a feature against the law catalog.
pub struct RelevanceScreener {
    client: Arc<dyn ModelClient>,
}

impl RelevanceScreener {
    /// Wrap a model client.
    #[must_use]
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    /// Return the catalog titles judged relevant to `feature`, in
    /// catalog order, deduplicated.
    ///
    /// Titles coming back from the model are re-resolved against the
    /// catalog case-insensitively, accepting containment in either
    /// direction, so `"GDPR (EU)"` still finds the catalog's `"GDPR"`
    /// and a clipped `"General Data Protection"` still finds the full
    /// title.
    pub async fn screen(&self, feature: &Feature, laws: &[Law]) -> Vec<String> {
        if laws.is_empty() {
            return Vec::new();
        }

        let request = screening_request(feature, laws);
        let text = match self.client.complete(&request).await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(
                    feature = %feature.name,
                    %error,
                    "screening call failed, keeping the full catalog in scope"
                );
                return laws.iter().map(|law| law.title.clone()).collect();
            }
        };

        match parse_title_list(&text) {
            ParseOutcome::Parsed(titles) => {
                let resolved = resolve_titles(&titles, laws);
                tracing::debug!(
                    feature = %feature.name,
                    returned = titles.len(),
                    resolved = resolved.len(),
                    "screening complete"
                );
                resolved
            }
            ParseOutcome::Failed { raw } => {
                tracing::warn!(
                    feature = %feature.name,
                    raw = %excerpt(&raw),
                    "unparseable screening response, treating as no relevant laws"
                );
                Vec::new()
            }
        }
    }
}

/// Map model titles back onto exact catalog titles. Iterating the
/// catalog keeps catalog order and makes deduplication structural.
fn resolve_titles(titles: &[String], laws: &[Law]) -> Vec<String> {
    let lowered: Vec<String> = titles
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    let mut resolved = Vec::new();
    for law in laws {
        let law_lower = law.title.to_lowercase();
        let hit = lowered
            .iter()
            .any(|title| law_lower.contains(title.as_str()) || title.contains(law_lower.as_str()));
        if hit {
            resolved.push(law.title.clone());
        }
    }
    resolved
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
