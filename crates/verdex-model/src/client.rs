//! # The Client Trait
//!
//! Object-safe and async: the pipeline holds `Arc<dyn ModelClient>` and
//! awaits completions without knowing what is behind the seam.

use async_trait::async_trait;

use crate::error::ModelError;

/// One completion request: a system framing, a user prompt, and the
/// sampling bounds the pipeline chose for the task.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System message setting the model's role and output contract.
    pub system: String,
    /// User message carrying the actual material.
    pub prompt: String,
    /// Sampling temperature. The pipeline keeps this low; verdicts
    /// should be as repeatable as the model allows.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

/// A source of text completions.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Run one completion. Exactly one attempt; no retries behind the
    /// seam.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] describing the transport, status, or
    /// shape failure.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError>;

    /// Identifier for logs (the model name for HTTP clients).
    fn client_name(&self) -> &str;
}
