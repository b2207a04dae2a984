//! # verdex CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Logs go to stderr so table and JSON output stay pipeable.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use verdex_cli::catalog::{run_catalog, CatalogArgs};
use verdex_cli::check::{run_check, CheckArgs};
use verdex_cli::TablePaths;

/// Verdex operator CLI.
///
/// Inspects the law and feature tables and runs compliance checks
/// against the configured model from the terminal.
#[derive(Parser, Debug)]
#[command(name = "verdex", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate and list the law and feature tables.
    Catalog(CatalogArgs),

    /// Run batch or discovery compliance checks.
    Check(CheckArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let paths = match TablePaths::from_env() {
        Ok(paths) => paths,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    let result = match cli.command {
        Commands::Catalog(args) => run_catalog(&args, &paths),
        Commands::Check(args) => run_check(&args, &paths).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use verdex_cli::catalog::CatalogCommand;
    use verdex_cli::check::CheckCommand;

    use super::*;

    #[test]
    fn cli_parse_catalog_validate() {
        let cli = Cli::try_parse_from(["verdex", "catalog", "validate"]).unwrap();
        let Commands::Catalog(args) = cli.command else {
            panic!("expected catalog subcommand");
        };
        assert!(matches!(args.command, CatalogCommand::Validate));
    }

    #[test]
    fn cli_parse_catalog_list_flags() {
        let cli = Cli::try_parse_from(["verdex", "catalog", "list", "--laws"]).unwrap();
        let Commands::Catalog(args) = cli.command else {
            panic!("expected catalog subcommand");
        };
        let CatalogCommand::List { laws, features } = args.command else {
            panic!("expected list subcommand");
        };
        assert!(laws);
        assert!(!features);
    }

    #[test]
    fn cli_parse_catalog_list_conflicting_flags_error() {
        let result = Cli::try_parse_from(["verdex", "catalog", "list", "--laws", "--features"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_check_batch_defaults() {
        let cli = Cli::try_parse_from(["verdex", "check", "batch"]).unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check subcommand");
        };
        let CheckCommand::Batch {
            features,
            laws,
            no_corrections,
            json,
        } = args.command
        else {
            panic!("expected batch subcommand");
        };
        assert!(features.is_empty());
        assert!(laws.is_empty());
        assert!(!no_corrections);
        assert!(!json);
    }

    #[test]
    fn cli_parse_check_batch_repeatable_narrowing() {
        let cli = Cli::try_parse_from([
            "verdex",
            "check",
            "batch",
            "--feature",
            "Dark Mode",
            "--feature",
            "Analytics Export",
            "--law",
            "GDPR",
            "--no-corrections",
            "--json",
        ])
        .unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check subcommand");
        };
        let CheckCommand::Batch {
            features,
            laws,
            no_corrections,
            json,
        } = args.command
        else {
            panic!("expected batch subcommand");
        };
        assert_eq!(features, vec!["Dark Mode", "Analytics Export"]);
        assert_eq!(laws, vec!["GDPR"]);
        assert!(no_corrections);
        assert!(json);
    }

    #[test]
    fn cli_parse_check_feature() {
        let cli = Cli::try_parse_from([
            "verdex",
            "check",
            "feature",
            "--name",
            "Email Digest",
            "--description",
            "Weekly activity summary emails",
        ])
        .unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check subcommand");
        };
        let CheckCommand::Feature {
            name, description, ..
        } = args.command
        else {
            panic!("expected feature subcommand");
        };
        assert_eq!(name, "Email Digest");
        assert_eq!(description, "Weekly activity summary emails");
    }

    #[test]
    fn cli_parse_check_feature_requires_description() {
        let result = Cli::try_parse_from(["verdex", "check", "feature", "--name", "Email Digest"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli0 = Cli::try_parse_from(["verdex", "catalog", "validate"]).unwrap();
        assert_eq!(cli0.verbose, 0);

        let cli2 = Cli::try_parse_from(["verdex", "-vv", "catalog", "validate"]).unwrap();
        assert_eq!(cli2.verbose, 2);
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["verdex"]).is_err());
    }

    #[test]
    fn cli_parse_invalid_subcommand_errors() {
        assert!(Cli::try_parse_from(["verdex", "nonexistent"]).is_err());
    }

    #[test]
    fn commands_debug_impl() {
        let cli = Cli::try_parse_from(["verdex", "catalog", "validate"]).unwrap();
        let debug = format!("{:?}", cli.command);
        assert!(debug.contains("Catalog"));
    }
}
