//! Wire types for the Gemini JSON responses.
//!
//! Request bodies are assembled inline with `serde_json::json!`; only the
//! response shapes get typed structs. Optional fields default to empty so a
//! structurally thin response surfaces as a malformed-response error instead
//! of a decode failure.

use serde::Deserialize;

/// Response payload of `models/{model}:embedContent`.
#[derive(Debug, Deserialize)]
pub(crate) struct EmbedContentResponse {
    #[serde(default)]
    pub(crate) embedding: EmbeddingValues,
}

/// The embedding vector carried by an [`EmbedContentResponse`].
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EmbeddingValues {
    #[serde(default)]
    pub(crate) values: Vec<f32>,
}

/// Response payload of `models/{model}:generateContent`.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub(crate) candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub(crate) content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub(crate) parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TextPart {
    #[serde(default)]
    pub(crate) text: String,
}
