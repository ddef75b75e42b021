//! Error definitions for the document processing surface.

use thiserror::Error;

use crate::blobstore::BlobStoreError;
use crate::storage::StorageError;

/// Errors surfaced by the upload operation.
///
/// Upload is the only processing entry point that reports errors to its
/// caller; the background pipeline itself absorbs every failure into a
/// terminal document status.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Raw upload bytes could not be stored.
    #[error("Failed to store upload: {0}")]
    Blob(#[from] BlobStoreError),
    /// Document record could not be persisted.
    #[error("Failed to persist document: {0}")]
    Storage(#[from] StorageError),
}

/// Unexpected failures that escape the pipeline's own step handling.
///
/// Controlled outcomes (missing blob, empty extraction, zero embedded
/// chunks) never appear here; they are recorded as a terminal status inside
/// the run. Anything that does appear is caught at the pipeline boundary and
/// forces the document to `Failed`.
#[derive(Debug, Error)]
pub(crate) enum PipelineError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Extraction task failed: {0}")]
    ExtractionTask(#[from] tokio::task::JoinError),
}
