//! # verdex-model — Model Client Seam
//!
//! The boundary between Verdex and the language model that does the
//! actual legal reasoning. The pipeline depends only on the
//! [`ModelClient`] trait; production wires in [`HttpModelClient`], tests
//! wire in scripted implementations.
//!
//! ## Timeout Discipline
//!
//! Every request carries a hard client-side timeout (default 30s) so a
//! stalled model call can never hang a compliance check. Retries are
//! deliberately not built in: callers get exactly one completion per
//! request and decide themselves what a failure means.

pub mod client;
pub mod error;
pub mod extract;
pub mod http;

pub use client::{CompletionRequest, ModelClient};
pub use error::ModelError;
pub use extract::{first_json_array, first_json_object, quoted_strings, strip_code_fences};
pub use http::{HttpModelClient, ModelConfig};
