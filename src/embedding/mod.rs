//! Embedding client capability interface.
//!
//! The pipeline and the query orchestrator depend on this trait only; the
//! Gemini adapter in [`crate::gemini`] is the production implementation.
//! Errors carry enough detail (status code plus raw body) to diagnose
//! provider failures from logs alone.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised by embedding providers.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Transport-level failure before a response was received, timeouts included.
    #[error("Embedding request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Provider responded with a non-success status.
    #[error("Unexpected embedding provider response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the provider.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Response parsed but did not carry a usable embedding.
    #[error("Malformed embedding response: {0}")]
    MalformedResponse(String),
}

/// Interface implemented by embedding backends.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Model identifier reported by the backend (e.g. `"text-embedding-004"`).
    fn model_name(&self) -> &str;

    /// Dimensionality of the vectors this backend produces.
    fn dims(&self) -> usize;

    /// Produce an embedding vector for the supplied text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}
