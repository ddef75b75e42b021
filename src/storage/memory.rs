//! In-memory [`DocumentStore`] implementation.
//!
//! Uses `Vec`s behind `std::sync::RwLock` for thread safety; locks are never
//! held across await points. Suitable as the reference backend and for tests:
//! chunk data at rest is immutable after a processing run completes, so
//! concurrent readers only contend briefly on the lock itself.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::models::{Document, DocumentChunk, EmbeddedChunk, ProcessingStatus};

use super::{DocumentStore, StorageError};

/// In-memory store backed by `RwLock`-guarded vectors.
#[derive(Default)]
pub struct InMemoryStore {
    documents: RwLock<Vec<Document>>,
    chunks: RwLock<Vec<DocumentChunk>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert_document(&self, document: &Document) -> Result<(), StorageError> {
        let mut documents = self.documents.write().expect("documents lock poisoned");
        documents.push(document.clone());
        Ok(())
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>, StorageError> {
        let documents = self.documents.read().expect("documents lock poisoned");
        Ok(documents.iter().find(|doc| doc.id == id).cloned())
    }

    async fn update_status(&self, id: &str, status: ProcessingStatus) -> Result<(), StorageError> {
        let mut documents = self.documents.write().expect("documents lock poisoned");
        if let Some(document) = documents.iter_mut().find(|doc| doc.id == id) {
            document.status = status;
        }
        Ok(())
    }

    async fn replace_chunks(
        &self,
        document_id: &str,
        mut new_chunks: Vec<DocumentChunk>,
    ) -> Result<(), StorageError> {
        let mut chunks = self.chunks.write().expect("chunks lock poisoned");
        chunks.retain(|chunk| chunk.document_id != document_id);
        chunks.append(&mut new_chunks);
        Ok(())
    }

    async fn list_documents(&self) -> Result<Vec<Document>, StorageError> {
        let documents = self.documents.read().expect("documents lock poisoned");
        let mut listed: Vec<Document> = documents.clone();
        listed.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(listed)
    }

    async fn list_embedded_chunks(&self) -> Result<Vec<EmbeddedChunk>, StorageError> {
        let documents = self.documents.read().expect("documents lock poisoned");
        let chunks = self.chunks.read().expect("chunks lock poisoned");
        let embedded = chunks
            .iter()
            .filter(|chunk| !chunk.embedding.is_empty())
            .filter_map(|chunk| {
                documents
                    .iter()
                    .find(|doc| doc.id == chunk.document_id)
                    .map(|doc| EmbeddedChunk {
                        chunk: chunk.clone(),
                        document_name: doc.file_name.clone(),
                    })
            })
            .collect();
        Ok(embedded)
    }
}
