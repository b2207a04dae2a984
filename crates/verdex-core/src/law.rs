//! # Law Records
//!
//! A law is one row of the regulatory catalog. The `id` field is carried
//! for reference and display; identity in the evaluation path is the
//! exact title, which is what model responses echo back.

use serde::{Deserialize, Serialize};

/// One regulation from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Law {
    /// Catalog identifier, e.g. `EU-2016-679`. Display only.
    pub id: String,
    /// Exact title. This is the law's identity during evaluation.
    pub title: String,
    /// Human-readable summary of what the law regulates.
    pub description: String,
    /// Jurisdiction the law belongs to, e.g. `EU` or `US-CA`.
    pub jurisdiction: String,
}

impl Law {
    /// Exact title match. Catalog rows are trimmed at load time, so only
    /// the query side is trimmed here.
    #[must_use]
    pub fn matches_title(&self, title: &str) -> bool {
        self.title == title.trim()
    }
}
