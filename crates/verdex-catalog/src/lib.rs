//! # verdex-catalog — Law and Feature Catalog
//!
//! Loads the regulatory catalog (laws) and the product catalog
//! (features) from delimited text files into memory and serves cloned
//! snapshots to the rest of the stack.
//!
//! ## Loading Model
//!
//! Startup load fails soft: a table whose file cannot be read or parsed
//! is left empty and marked not ready, the error is logged, and the
//! process stays up. Callers gate on [`CatalogStore::is_ready`] before
//! trusting catalog contents. An explicit [`CatalogStore::reload`] is
//! strict instead: it reports the failure and keeps the previous
//! snapshot.
//!
//! ## File Format
//!
//! One record per line, fields separated by a configurable delimiter. A
//! double quote toggles quoting; delimiters inside quotes are literal;
//! there is no escape sequence for a quote inside a field. The first
//! line is a header and is skipped. Rows with fewer fields than the
//! table requires are skipped with a warning.

pub mod error;
pub mod store;
pub mod table;

pub use error::CatalogError;
pub use store::CatalogStore;
pub use table::{format_row, parse_line, parse_table};
