//! # verdex-feedback — Correction Store
//!
//! Persists reviewer feedback about (feature, law) verdicts in a single
//! JSON document with three top-level fields: `corrections` (entries of
//! kind `correction` only), `feedback` (every submission), and
//! `last_updated`.
//!
//! ## Write Path
//!
//! Every mutation runs under one mutex as clone, apply, persist, commit:
//! the document is cloned, the change is applied to the clone, the clone
//! is written to a temp file in the target directory and renamed over
//! the real file, and only then does the clone replace the in-memory
//! document. A failed write therefore leaves memory and disk agreeing
//! on the previous state, and a crash mid-write leaves either the old
//! file or the new file, never a torn one.

pub mod error;
pub mod store;

pub use error::FeedbackError;
pub use store::{FeedbackDocument, FeedbackStore};
