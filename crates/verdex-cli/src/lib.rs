//! # verdex-cli — Operator CLI for Verdex
//!
//! Provides the `verdex` command-line interface for working with a
//! deployment's data files and model from the terminal.
//!
//! ## Subcommands
//!
//! - `verdex catalog` — validate and list the law and feature tables.
//! - `verdex check` — run batch or discovery compliance checks.
//!
//! Configuration comes from the same `VERDEX_*` environment variables
//! the API binary reads, so the CLI runs against a deployment's data
//! directory unchanged:
//!
//! ```bash
//! verdex catalog validate
//! verdex check batch --feature "Dark Mode" --json
//! ```

pub mod catalog;
pub mod check;

use std::path::PathBuf;

use anyhow::{bail, Result};

/// Data file locations shared by every subcommand.
#[derive(Debug, Clone)]
pub struct TablePaths {
    pub laws: PathBuf,
    pub features: PathBuf,
    pub delimiter: char,
    pub feedback: PathBuf,
}

impl TablePaths {
    /// Read locations from the environment, falling back to the same
    /// defaults the API binary uses.
    pub fn from_env() -> Result<Self> {
        let delimiter = match std::env::var("VERDEX_CATALOG_DELIMITER") {
            Ok(raw) => parse_delimiter(&raw)?,
            Err(_) => ',',
        };
        Ok(Self {
            laws: var_or("VERDEX_LAWS_PATH", "data/laws.csv").into(),
            features: var_or("VERDEX_FEATURES_PATH", "data/features.csv").into(),
            delimiter,
            feedback: var_or("VERDEX_FEEDBACK_PATH", "data/feedback.json").into(),
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_delimiter(raw: &str) -> Result<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => bail!("VERDEX_CATALOG_DELIMITER must be exactly one character, got {raw:?}"),
    }
}
