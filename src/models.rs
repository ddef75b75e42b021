//! Core data types that flow through the ingestion and query pipelines.
//!
//! Documents and chunks are the persisted shapes; query requests and
//! responses are ephemeral per-request values shaped for the HTTP surface.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Lifecycle state of a document's processing run.
///
/// Transitions move forward only (`Uploaded -> Processing -> Completed | Failed`);
/// an explicit reprocessing request starts a fresh cycle from `Processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingStatus {
    /// Raw bytes stored, processing not yet started.
    Uploaded,
    /// A processing run is in flight.
    Processing,
    /// At least one chunk was embedded and persisted.
    Completed,
    /// No text, no chunks, or no chunk embedded successfully.
    Failed,
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Uploaded => "Uploaded",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// An uploaded document and its processing state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Opaque unique identifier assigned at upload time.
    pub id: String,
    /// Display name of the uploaded file.
    pub file_name: String,
    /// MIME content type reported at upload.
    pub content_type: String,
    /// Size of the raw upload in bytes.
    pub size_bytes: u64,
    /// Upload instant, RFC 3339 in JSON.
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
    /// Current processing lifecycle state.
    pub status: ProcessingStatus,
}

/// A bounded slice of a document's extracted text with its embedding vector.
///
/// Chunks are created in bulk by a single processing run and never mutated
/// afterwards; chunks whose embedding failed are simply never persisted.
#[derive(Debug, Clone)]
pub struct DocumentChunk {
    /// Opaque unique identifier.
    pub id: String,
    /// Identifier of the owning document.
    pub document_id: String,
    /// Chunk text content; never empty.
    pub content: String,
    /// Zero-based position within the document's chunk sequence.
    pub chunk_index: usize,
    /// Embedding vector; length matches the provider dimensionality.
    pub embedding: Vec<f32>,
}

/// A persisted chunk joined with its owning document's display name.
///
/// This is the shape the query path consumes: only chunks with a non-empty
/// embedding appear, annotated with enough metadata to cite the source.
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    /// The chunk record, embedding included.
    pub chunk: DocumentChunk,
    /// Display name of the owning document.
    pub document_name: String,
}

/// A natural-language question posed against the processed corpus.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// The question text.
    pub question: String,
    /// Optional cap on the number of cited sources; defaults from config.
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// A retrieved chunk cited as grounding for an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceChunk {
    /// Chunk text included in the grounding context.
    pub content: String,
    /// Display name of the document the chunk came from.
    pub file_name: String,
    /// Cosine similarity between the query and the chunk embedding.
    pub similarity: f32,
    /// Zero-based index of the chunk within its document.
    pub chunk_index: usize,
}

/// The answer produced for a [`QueryRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated (or canned/degraded) answer text.
    pub answer: String,
    /// Cited sources in similarity-ranked order.
    pub sources: Vec<SourceChunk>,
    /// Label identifying what produced the answer (`"system"`, `"error"`, or a model name).
    pub model: String,
}
