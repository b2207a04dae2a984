//! # Catalog CLI — validate and list the law and feature tables.
//!
//! ## Usage
//!
//! ```bash
//! # Check that both tables load from the configured paths:
//! verdex catalog validate
//!
//! # Print the loaded rows:
//! verdex catalog list
//! verdex catalog list --laws
//! verdex catalog list --features
//! ```
//!
//! `validate` exits 1 when either table failed to load, so it can gate
//! deployment scripts.

use anyhow::Result;
use clap::{Args, Subcommand};

use verdex_catalog::CatalogStore;

use crate::TablePaths;

/// Catalog subcommand arguments.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

/// Available catalog subcommands.
#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
    /// Load both tables and report row counts and per-table state.
    Validate,

    /// Print the loaded rows.
    List {
        /// Only the law table.
        #[arg(long)]
        laws: bool,

        /// Only the feature table.
        #[arg(long, conflicts_with = "laws")]
        features: bool,
    },
}

/// Execute the catalog subcommand.
pub fn run_catalog(args: &CatalogArgs, paths: &TablePaths) -> Result<u8> {
    match &args.command {
        CatalogCommand::Validate => run_validate(paths),
        CatalogCommand::List { laws, features } => run_list(paths, *laws, *features),
    }
}

fn load(paths: &TablePaths) -> CatalogStore {
    CatalogStore::load(&paths.laws, &paths.features, paths.delimiter)
}

fn run_validate(paths: &TablePaths) -> Result<u8> {
    let store = load(paths);
    let (laws_ready, features_ready) = store.tables_ready();

    println!(
        "  laws:     {:>5} rows  {}  {}",
        store.law_count(),
        state_word(laws_ready),
        paths.laws.display()
    );
    println!(
        "  features: {:>5} rows  {}  {}",
        store.feature_count(),
        state_word(features_ready),
        paths.features.display()
    );
    println!();

    if store.is_ready() {
        println!("catalog ready");
        Ok(0)
    } else {
        println!("catalog NOT ready");
        Ok(1)
    }
}

fn state_word(ready: bool) -> &'static str {
    if ready {
        "ok    "
    } else {
        "FAILED"
    }
}

fn run_list(paths: &TablePaths, laws_only: bool, features_only: bool) -> Result<u8> {
    let store = load(paths);
    let both = !laws_only && !features_only;

    if laws_only || both {
        let laws = store.laws();
        println!("Laws ({}):", laws.len());
        for law in &laws {
            println!("  {:<16} {:<40} {}", law.id, law.title, law.jurisdiction);
        }
    }

    if both {
        println!();
    }

    if features_only || both {
        let features = store.features();
        println!("Features ({}):", features.len());
        for feature in &features {
            println!("  {:<28} {}", feature.name, feature.description);
        }
    }

    Ok(0)
}
