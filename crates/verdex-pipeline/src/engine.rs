//! # Check Engine
//!
//! Front door of the pipeline. Owns the two stores and the two model
//! stages and exposes the two report-producing operations: batch checks
//! over named catalog entries, and discovery checks for an ad-hoc
//! feature that may not be catalogued at all.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use verdex_catalog::CatalogStore;
use verdex_core::{ComplianceSummary, Feature, Law, Verdict};
use verdex_feedback::FeedbackStore;
use verdex_model::ModelClient;

use crate::evaluator::PairEvaluator;
use crate::screener::RelevanceScreener;

/// Per-run evaluation switches.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationOptions {
    /// Feed implemented corrections for each pair into its prompt.
    pub include_corrections: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            include_corrections: true,
        }
    }
}

/// Result of a batch check over catalogued features and laws.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub verdicts: Vec<Verdict>,
    pub summary: ComplianceSummary,
}

/// Result of a single-feature discovery check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryReport {
    pub feature_name: String,
    /// Catalog titles the screener kept, in catalog order.
    pub relevant_law_titles: Vec<String>,
    pub verdicts: Vec<Verdict>,
    pub summary: ComplianceSummary,
}

/// Orchestrates screening and pair evaluation over the stores.
pub struct CheckEngine {
    catalog: Arc<CatalogStore>,
    feedback: Arc<FeedbackStore>,
    screener: RelevanceScreener,
    evaluator: PairEvaluator,
}

impl CheckEngine {
    /// Wire the engine. Both stages share the one model client.
    pub fn new(
        catalog: Arc<CatalogStore>,
        feedback: Arc<FeedbackStore>,
        client: Arc<dyn ModelClient>,
    ) -> Self {
        Self {
            catalog,
            feedback,
            screener: RelevanceScreener::new(Arc::clone(&client)),
            evaluator: PairEvaluator::new(client),
        }
    }

    /// Evaluate every selected (feature, law) pair and aggregate.
    ///
    /// `None` selects the whole catalog axis; `Some` names entries to
    /// resolve against it. Unknown names are logged and skipped, and
    /// repeats collapse to their first occurrence, so the pair grid is
    /// duplicate-free. Pairs run feature-major in selection order.
    pub async fn check_batch(
        &self,
        law_titles: Option<Vec<String>>,
        feature_names: Option<Vec<String>>,
        options: EvaluationOptions,
    ) -> BatchReport {
        let laws = self.select_laws(law_titles);
        let features = self.select_features(feature_names);
        tracing::info!(
            features = features.len(),
            laws = laws.len(),
            include_corrections = options.include_corrections,
            "starting batch check"
        );

        let verdicts = self.evaluate_pairs(&features, &laws, options).await;
        let summary = ComplianceSummary::from_verdicts(&verdicts);
        BatchReport { verdicts, summary }
    }

    /// Screen an ad-hoc feature against the full catalog, then evaluate
    /// only the laws the screener kept. An empty screening result
    /// short-circuits: no evaluation calls, empty report.
    pub async fn check_feature(
        &self,
        feature: &Feature,
        options: EvaluationOptions,
    ) -> DiscoveryReport {
        let catalog = self.catalog.laws();
        let relevant_titles = self.screener.screen(feature, &catalog).await;

        let relevant: Vec<Law> = catalog
            .into_iter()
            .filter(|law| relevant_titles.iter().any(|title| title == &law.title))
            .collect();

        if relevant.is_empty() {
            tracing::info!(feature = %feature.name, "no relevant laws, skipping evaluation");
            return DiscoveryReport {
                feature_name: feature.name.clone(),
                relevant_law_titles: relevant_titles,
                verdicts: Vec::new(),
                summary: ComplianceSummary::from_verdicts(&[]),
            };
        }

        let features = std::slice::from_ref(feature);
        let verdicts = self.evaluate_pairs(features, &relevant, options).await;
        let summary = ComplianceSummary::from_verdicts(&verdicts);
        DiscoveryReport {
            feature_name: feature.name.clone(),
            relevant_law_titles: relevant_titles,
            verdicts,
            summary,
        }
    }

    async fn evaluate_pairs(
        &self,
        features: &[Feature],
        laws: &[Law],
        options: EvaluationOptions,
    ) -> Vec<Verdict> {
        let mut verdicts = Vec::with_capacity(features.len() * laws.len());
        for feature in features {
            for law in laws {
                let corrections = if options.include_corrections {
                    self.feedback.implemented_for(&feature.name, &law.title)
                } else {
                    Vec::new()
                };
                let verdict = self.evaluator.evaluate(feature, law, &corrections).await;
                verdicts.push(verdict);
            }
        }
        verdicts
    }

    fn select_laws(&self, titles: Option<Vec<String>>) -> Vec<Law> {
        match titles {
            None => self.catalog.laws(),
            Some(titles) => {
                let mut selected: Vec<Law> = Vec::new();
                for title in titles {
                    match self.catalog.find_law_by_title(&title) {
                        Some(law) => {
                            if !selected.iter().any(|kept| kept.title == law.title) {
                                selected.push(law);
                            }
                        }
                        None => {
                            tracing::warn!(%title, "unknown law title in selection, skipping");
                        }
                    }
                }
                selected
            }
        }
    }

    fn select_features(&self, names: Option<Vec<String>>) -> Vec<Feature> {
        match names {
            None => self.catalog.features(),
            Some(names) => {
                let mut selected: Vec<Feature> = Vec::new();
                for name in names {
                    match self.catalog.find_feature_by_name(&name) {
                        Some(feature) => {
                            if !selected.iter().any(|kept| kept.matches_name(&feature.name)) {
                                selected.push(feature);
                            }
                        }
                        None => {
                            tracing::warn!(%name, "unknown feature name in selection, skipping");
                        }
                    }
                }
                selected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_includes_corrections() {
        assert!(EvaluationOptions::default().include_corrections);
    }

    #[test]
    fn batch_report_serializes_summary() {
        let report = BatchReport {
            verdicts: Vec::new(),
            summary: ComplianceSummary::from_verdicts(&[]),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["summary"]["total"], 0);
        assert_eq!(value["summary"]["risk_score"], 0);
    }
}
