//! # Service Configuration
//!
//! Environment-driven settings for the API binary, read once at startup
//! and injected through [`crate::state::AppState`]. Model settings live
//! with the model client (`verdex_model::ModelConfig`); this struct owns
//! the store paths and the listen address.

use std::path::PathBuf;

use thiserror::Error;

/// Laws table path.
pub const ENV_LAWS_PATH: &str = "VERDEX_LAWS_PATH";
/// Features table path.
pub const ENV_FEATURES_PATH: &str = "VERDEX_FEATURES_PATH";
/// Catalog field delimiter (single character).
pub const ENV_CATALOG_DELIMITER: &str = "VERDEX_CATALOG_DELIMITER";
/// Feedback document path.
pub const ENV_FEEDBACK_PATH: &str = "VERDEX_FEEDBACK_PATH";
/// Listen address.
pub const ENV_BIND_ADDR: &str = "VERDEX_BIND_ADDR";

const DEFAULT_LAWS_PATH: &str = "data/laws.csv";
const DEFAULT_FEATURES_PATH: &str = "data/features.csv";
const DEFAULT_FEEDBACK_PATH: &str = "data/feedback.json";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// A configuration variable could not be interpreted.
#[derive(Debug, Error)]
#[error("{var}: {reason}")]
pub struct ConfigError {
    /// The offending variable.
    pub var: &'static str,
    /// What was wrong with its value.
    pub reason: String,
}

/// Settings for the API binary.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Laws table file.
    pub laws_path: PathBuf,
    /// Features table file.
    pub features_path: PathBuf,
    /// Field delimiter for both tables.
    pub delimiter: char,
    /// Feedback JSON document.
    pub feedback_path: PathBuf,
    /// Address the server listens on.
    pub bind_addr: String,
}

impl ApiConfig {
    /// Read the configuration from `VERDEX_*` environment variables,
    /// falling back to the documented defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the delimiter override is not a
    /// single character.
    pub fn from_env() -> Result<Self, ConfigError> {
        let var_or = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };

        let delimiter = match std::env::var(ENV_CATALOG_DELIMITER) {
            Ok(raw) => parse_delimiter(&raw)?,
            Err(_) => ',',
        };

        Ok(Self {
            laws_path: var_or(ENV_LAWS_PATH, DEFAULT_LAWS_PATH).into(),
            features_path: var_or(ENV_FEATURES_PATH, DEFAULT_FEATURES_PATH).into(),
            delimiter,
            feedback_path: var_or(ENV_FEEDBACK_PATH, DEFAULT_FEEDBACK_PATH).into(),
            bind_addr: var_or(ENV_BIND_ADDR, DEFAULT_BIND_ADDR),
        })
    }
}

fn parse_delimiter(raw: &str) -> Result<char, ConfigError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError {
            var: ENV_CATALOG_DELIMITER,
            reason: format!("must be exactly one character, got {raw:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_character_delimiters_parse() {
        assert_eq!(parse_delimiter(",").unwrap(), ',');
        assert_eq!(parse_delimiter(";").unwrap(), ';');
        assert_eq!(parse_delimiter("\t").unwrap(), '\t');
    }

    #[test]
    fn multi_character_delimiter_is_rejected() {
        assert!(parse_delimiter(",,").is_err());
        assert!(parse_delimiter("").is_err());
        let err = parse_delimiter("ab").unwrap_err();
        assert_eq!(err.var, ENV_CATALOG_DELIMITER);
    }
}
