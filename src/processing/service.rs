//! Document lifecycle service: upload, background processing, and listing.
//!
//! The service owns long-lived handles to the storage, blob, extraction, and
//! embedding collaborators so the HTTP surface and background tasks reuse the
//! same components. Processing runs detached from any request: the upload and
//! trigger handlers enqueue work via [`DocumentApi::queue_processing`] and the
//! run reports its outcome only through the persisted status and tracing.

use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::blobstore::{BlobStore, BlobStoreError};
use crate::config::get_config;
use crate::embedding::EmbeddingClient;
use crate::extract::TextExtractor;
use crate::metrics::{MetricsSnapshot, ServiceMetrics};
use crate::models::{Document, DocumentChunk, ProcessingStatus};
use crate::processing::chunking::chunk_text;
use crate::processing::types::{PipelineError, UploadError};
use crate::storage::{DocumentStore, StorageError};

/// Abstraction over the document surface used by HTTP handlers and tests.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Create a document record, store its raw bytes, and detach a processing run.
    async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Document, UploadError>;

    /// All documents, newest upload first.
    async fn list_documents(&self) -> Result<Vec<Document>, StorageError>;

    /// Detach a processing run for the given document. Fire-and-forget: the
    /// caller never blocks on the run and never receives its errors.
    fn queue_processing(&self, document_id: String);

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

/// Coordinates the full document pipeline: extraction, chunking, embedding,
/// and persistence.
#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    extractor: Arc<dyn TextExtractor>,
    embedder: Arc<dyn EmbeddingClient>,
    metrics: Arc<ServiceMetrics>,
}

impl DocumentService {
    /// Build a new document service from its collaborators.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        extractor: Arc<dyn TextExtractor>,
        embedder: Arc<dyn EmbeddingClient>,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            store,
            blobs,
            extractor,
            embedder,
            metrics,
        }
    }

    /// Drive one document from its current state to a terminal status.
    ///
    /// Side effects only: status updates and chunk records. Never returns an
    /// error; every failure is absorbed here and reflected as a persisted
    /// `Failed` status, because this runs detached from any request cycle.
    /// Two concurrent runs on the same document race benignly; the last
    /// status write wins.
    pub async fn process_document(&self, document_id: &str) {
        tracing::info!(document_id, "Starting document processing");
        if let Err(error) = self.run(document_id).await {
            tracing::error!(
                document_id,
                error = %error,
                "Document processing failed unexpectedly"
            );
            self.force_failed(document_id).await;
        }
    }

    async fn run(&self, document_id: &str) -> Result<(), PipelineError> {
        let Some(document) = self.store.get_document(document_id).await? else {
            // Deleted concurrently; nothing to do.
            tracing::warn!(document_id, "Document not found; skipping processing");
            return Ok(());
        };

        // Persist `Processing` immediately so concurrent readers observe progress.
        self.store
            .update_status(document_id, ProcessingStatus::Processing)
            .await?;

        let key = blob_key(&document.id, &document.file_name);
        let bytes = match self.blobs.get(&key).await {
            Ok(bytes) => bytes,
            Err(BlobStoreError::NotFound(_)) => {
                tracing::warn!(document_id, key, "Raw upload missing; marking document failed");
                return self.finish_failed(document_id).await;
            }
            Err(error) => {
                tracing::error!(document_id, key, error = %error, "Failed to read raw upload");
                return self.finish_failed(document_id).await;
            }
        };

        let extractor = self.extractor.clone();
        let text = match tokio::task::spawn_blocking(move || extractor.extract(&bytes)).await? {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(document_id, error = %error, "Text extraction failed");
                return self.finish_failed(document_id).await;
            }
        };
        if text.trim().is_empty() {
            tracing::warn!(document_id, "No text extracted; marking document failed");
            return self.finish_failed(document_id).await;
        }
        tracing::debug!(document_id, characters = text.len(), "Extracted document text");

        let config = get_config();
        let chunks = chunk_text(&text, config.chunk_size, config.chunk_overlap_words);
        if chunks.is_empty() {
            tracing::warn!(document_id, "Chunker produced no chunks; marking document failed");
            return self.finish_failed(document_id).await;
        }
        tracing::debug!(document_id, chunks = chunks.len(), "Chunked document text");

        let (staged, failed) = self.embed_chunks(&document, chunks).await;
        self.metrics
            .record_document(staged.len() as u64, failed.len() as u64);

        if staged.is_empty() {
            tracing::warn!(
                document_id,
                attempted = failed.len(),
                "No chunk embedded successfully; marking document failed"
            );
            return self.finish_failed(document_id).await;
        }

        let embedded = staged.len();
        self.store.replace_chunks(document_id, staged).await?;
        self.store
            .update_status(document_id, ProcessingStatus::Completed)
            .await?;
        tracing::info!(
            document_id,
            embedded,
            failed = failed.len(),
            "Document processing completed"
        );
        Ok(())
    }

    /// Attempt to embed every chunk independently, in chunk order.
    ///
    /// A single chunk failure never aborts the document; the fold returns the
    /// staged records alongside the indices that failed so the terminal
    /// status is decided purely from the aggregate. Original chunk indices
    /// are preserved, never renumbered around gaps. There is no per-chunk
    /// retry; a lost chunk stays lost until the document is reprocessed.
    async fn embed_chunks(
        &self,
        document: &Document,
        chunks: Vec<String>,
    ) -> (Vec<DocumentChunk>, Vec<usize>) {
        let expected_dims = self.embedder.dims();
        let mut staged = Vec::with_capacity(chunks.len());
        let mut failed = Vec::new();

        for (chunk_index, content) in chunks.into_iter().enumerate() {
            match self.embedder.embed(&content).await {
                Ok(embedding) if embedding.len() != expected_dims => {
                    tracing::warn!(
                        document_id = %document.id,
                        chunk_index,
                        expected = expected_dims,
                        actual = embedding.len(),
                        "Embedding dimensionality mismatch; dropping chunk"
                    );
                    failed.push(chunk_index);
                }
                Ok(embedding) => {
                    staged.push(DocumentChunk {
                        id: Uuid::new_v4().to_string(),
                        document_id: document.id.clone(),
                        content,
                        chunk_index,
                        embedding,
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        document_id = %document.id,
                        chunk_index,
                        error = %error,
                        "Chunk embedding failed; continuing with remaining chunks"
                    );
                    failed.push(chunk_index);
                }
            }
        }

        (staged, failed)
    }

    async fn finish_failed(&self, document_id: &str) -> Result<(), PipelineError> {
        self.store
            .update_status(document_id, ProcessingStatus::Failed)
            .await?;
        Ok(())
    }

    async fn force_failed(&self, document_id: &str) {
        if let Err(error) = self
            .store
            .update_status(document_id, ProcessingStatus::Failed)
            .await
        {
            tracing::error!(
                document_id,
                error = %error,
                "Failed to record terminal status after pipeline error"
            );
        }
    }
}

#[async_trait]
impl DocumentApi for DocumentService {
    async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Document, UploadError> {
        let document = Document {
            id: Uuid::new_v4().to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            size_bytes: bytes.len() as u64,
            uploaded_at: OffsetDateTime::now_utc(),
            status: ProcessingStatus::Uploaded,
        };

        self.blobs
            .put(&blob_key(&document.id, &document.file_name), &bytes)
            .await?;
        self.store.insert_document(&document).await?;
        tracing::info!(
            document_id = %document.id,
            file_name = %document.file_name,
            size_bytes = document.size_bytes,
            "Stored uploaded document"
        );

        self.queue_processing(document.id.clone());
        Ok(document)
    }

    async fn list_documents(&self) -> Result<Vec<Document>, StorageError> {
        self.store.list_documents().await
    }

    fn queue_processing(&self, document_id: String) {
        let service = self.clone();
        tokio::spawn(async move {
            service.process_document(&document_id).await;
        });
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// Blob key for a document's raw bytes: `{id}_{sanitized file name}`.
///
/// File names come from clients; anything outside a conservative character
/// set is replaced so the key stays a flat name the blob store accepts.
fn blob_key(document_id: &str, file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{document_id}_{safe}")
}
