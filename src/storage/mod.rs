//! Persistence abstraction for documents and chunks.
//!
//! The [`DocumentStore`] trait defines the narrow set of operations the
//! pipeline and the query orchestrator need: per-document status updates,
//! bulk chunk replacement, and two read views. Backends must be
//! `Send + Sync`; the in-memory implementation in [`memory`] is the
//! reference backend.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Document, DocumentChunk, EmbeddedChunk, ProcessingStatus};

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend rejected or failed the operation.
    #[error("Storage operation failed: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Abstract storage backend for documents and their chunks.
///
/// Writes are per-document scoped; no operation spans documents. Status
/// updates on a missing document are a no-op so that a run racing a
/// concurrent delete stops without error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a freshly uploaded document record.
    async fn insert_document(&self, document: &Document) -> Result<(), StorageError>;

    /// Fetch a document by id.
    async fn get_document(&self, id: &str) -> Result<Option<Document>, StorageError>;

    /// Update a document's processing status; no-op when the id is unknown.
    async fn update_status(&self, id: &str, status: ProcessingStatus) -> Result<(), StorageError>;

    /// Replace all chunks for a document with the given set in one write.
    ///
    /// A reprocessing run regenerates every chunk from scratch, so the
    /// replacement keeps `chunk_index` unique per document across runs.
    async fn replace_chunks(
        &self,
        document_id: &str,
        chunks: Vec<DocumentChunk>,
    ) -> Result<(), StorageError>;

    /// All documents, ordered by upload time descending.
    async fn list_documents(&self) -> Result<Vec<Document>, StorageError>;

    /// All chunks with a non-empty embedding, joined with their owning
    /// document's display name.
    async fn list_embedded_chunks(&self) -> Result<Vec<EmbeddedChunk>, StorageError>;
}
