//! # Feature Records
//!
//! A feature is one row of the product catalog. Feature identity is the
//! name, compared case-insensitively after trimming, so `Dark Mode` and
//! `dark mode ` are the same feature and cannot coexist in a catalog.

use serde::{Deserialize, Serialize};

use crate::error::{reject_quotes, require_text, ValidationError};

/// One product feature from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Feature name. Unique within a catalog under case-insensitive
    /// comparison.
    pub name: String,
    /// What the feature does, in the words used for model prompts.
    pub description: String,
}

impl Feature {
    /// Build a validated feature: both fields trimmed and non-blank,
    /// neither containing a double quote (the catalog file format has no
    /// escape sequence).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when a field is blank or contains a
    /// double quote.
    pub fn new(name: &str, description: &str) -> Result<Self, ValidationError> {
        reject_quotes("name", name)?;
        reject_quotes("description", description)?;
        let name = require_text("name", name)?;
        let description = require_text("description", description)?;
        Ok(Self { name, description })
    }

    /// Case-insensitive name comparison after trimming both sides.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        normalized(&self.name) == normalized(name)
    }
}

/// Canonical form used for feature-name comparison.
#[must_use]
pub fn normalized(name: &str) -> String {
    name.trim().to_lowercase()
}
