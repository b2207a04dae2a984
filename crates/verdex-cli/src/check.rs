//! # Check CLI — run compliance checks from the terminal.
//!
//! ## Usage
//!
//! ```bash
//! # The full catalog grid:
//! verdex check batch
//!
//! # One feature against two laws, raw JSON report:
//! verdex check batch --feature "Dark Mode" --law GDPR --law CCPA --json
//!
//! # Discovery for a feature that is not in the catalog:
//! verdex check feature --name "Email Digest" \
//!     --description "Weekly activity summary emails"
//! ```
//!
//! Check subcommands exit 1 when any verdict is flagged, so they can
//! gate CI pipelines. Model access uses the `VERDEX_MODEL_*` variables.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use clap::{Args, Subcommand};

use verdex_catalog::CatalogStore;
use verdex_core::{require_text, ComplianceSummary, Feature, Verdict};
use verdex_feedback::FeedbackStore;
use verdex_model::{HttpModelClient, ModelConfig};
use verdex_pipeline::{CheckEngine, DiscoveryReport, EvaluationOptions};

use crate::TablePaths;

/// Check subcommand arguments.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(subcommand)]
    pub command: CheckCommand,
}

/// Available check subcommands.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Evaluate catalog features against catalog laws.
    Batch {
        /// Check only this catalog feature. Repeatable.
        #[arg(long = "feature")]
        features: Vec<String>,

        /// Check only against this law title. Repeatable.
        #[arg(long = "law")]
        laws: Vec<String>,

        /// Leave implemented corrections out of the prompts.
        #[arg(long)]
        no_corrections: bool,

        /// Print the raw JSON report instead of the table.
        #[arg(long)]
        json: bool,
    },

    /// Screen an ad-hoc feature for relevant laws, then evaluate it.
    Feature {
        /// Feature name.
        #[arg(long)]
        name: String,

        /// What the feature does, in a sentence or two.
        #[arg(long)]
        description: String,

        /// Leave implemented corrections out of the prompts.
        #[arg(long)]
        no_corrections: bool,

        /// Print the raw JSON report instead of the table.
        #[arg(long)]
        json: bool,
    },
}

/// Execute the check subcommand.
pub async fn run_check(args: &CheckArgs, paths: &TablePaths) -> Result<u8> {
    let engine = build_engine(paths)?;

    match &args.command {
        CheckCommand::Batch {
            features,
            laws,
            no_corrections,
            json,
        } => {
            let report = engine
                .check_batch(narrow(laws), narrow(features), options(*no_corrections))
                .await;
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_verdicts(&report.verdicts, &report.summary));
            }
            Ok(exit_code(&report.verdicts))
        }
        CheckCommand::Feature {
            name,
            description,
            no_corrections,
            json,
        } => {
            // Ad-hoc features are never written to the catalog file, so
            // only the blank-field rule applies, not the quote rule.
            let feature = Feature {
                name: require_text("name", name)?,
                description: require_text("description", description)?,
            };
            let report = engine.check_feature(&feature, options(*no_corrections)).await;
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_discovery(&report));
            }
            Ok(exit_code(&report.verdicts))
        }
    }
}

/// Build the same component graph the API binary wires at startup.
fn build_engine(paths: &TablePaths) -> Result<CheckEngine> {
    let catalog = Arc::new(CatalogStore::load(
        &paths.laws,
        &paths.features,
        paths.delimiter,
    ));
    ensure!(
        catalog.is_ready(),
        "catalog tables failed to load; run `verdex catalog validate`"
    );

    let feedback = Arc::new(
        FeedbackStore::open(&paths.feedback)
            .with_context(|| format!("opening feedback store {}", paths.feedback.display()))?,
    );
    let config = ModelConfig::from_env().context("model configuration")?;
    let client = Arc::new(HttpModelClient::new(config)?);

    Ok(CheckEngine::new(catalog, feedback, client))
}

fn narrow(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

fn options(no_corrections: bool) -> EvaluationOptions {
    EvaluationOptions {
        include_corrections: !no_corrections,
    }
}

fn exit_code(verdicts: &[Verdict]) -> u8 {
    if verdicts.iter().any(|verdict| verdict.status.is_flagged()) {
        1
    } else {
        0
    }
}

/// One line per verdict; flagged verdicts also print their reasoning
/// and recommendations, indented.
fn render_verdicts(verdicts: &[Verdict], summary: &ComplianceSummary) -> String {
    let mut out = String::new();
    for verdict in verdicts {
        let _ = writeln!(
            out,
            "{:<16} {}  /  {}",
            verdict.status.as_str(),
            verdict.feature_name,
            verdict.law_title
        );
        if verdict.status.is_flagged() {
            let _ = writeln!(out, "    {}", verdict.reasoning);
            for recommendation in &verdict.recommendations {
                let _ = writeln!(out, "      - {recommendation}");
            }
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "total: {}   compliant: {}   non_compliant: {}   requires_review: {}   risk score: {}",
        summary.total,
        summary.compliant,
        summary.non_compliant,
        summary.requires_review,
        summary.risk_score
    );
    out
}

fn render_discovery(report: &DiscoveryReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "feature: {}", report.feature_name);
    let relevant = if report.relevant_law_titles.is_empty() {
        "none".to_string()
    } else {
        report.relevant_law_titles.join(", ")
    };
    let _ = writeln!(out, "relevant laws: {relevant}");
    let _ = writeln!(out);
    out.push_str(&render_verdicts(&report.verdicts, &report.summary));
    out
}
