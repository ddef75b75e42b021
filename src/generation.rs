//! Text generation client capability interface.
//!
//! Mirrors [`crate::embedding`]: a narrow trait the query orchestrator
//! depends on, with the Gemini adapter as the production implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised by generation providers.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Transport-level failure before a response was received, timeouts included.
    #[error("Generation request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Provider responded with a non-success status.
    #[error("Unexpected generation provider response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the provider.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Response parsed but carried no generated candidate text.
    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),
}

/// Sampling and length bounds applied to a generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    /// Sampling temperature; the query path keeps this low to stay grounded.
    pub temperature: f32,
    /// Upper bound on generated output tokens.
    pub max_output_tokens: u32,
}

/// Interface implemented by generation backends.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Model identifier reported by the backend (e.g. `"gemini-2.0-flash"`).
    fn model_name(&self) -> &str;

    /// Generate a completion for `prompt` under the given options.
    async fn generate(
        &self,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String, GenerationError>;
}
