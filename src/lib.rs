#![deny(missing_docs)]

//! Core library for the DocRAG document Q&A server.

/// HTTP routing and REST handlers.
pub mod api;
/// Blob storage for raw uploaded bytes.
pub mod blobstore;
/// Environment-driven configuration management.
pub mod config;
/// Embedding client abstraction.
pub mod embedding;
/// Text extraction from raw document bytes.
pub mod extract;
/// Gemini provider adapters.
pub mod gemini;
/// Generation client abstraction.
pub mod generation;
/// Structured logging and tracing setup.
pub mod logging;
/// Pipeline and query activity counters.
pub mod metrics;
/// Core data types for documents, chunks, and queries.
pub mod models;
/// Document processing pipeline.
pub mod processing;
/// Retrieval-augmented query orchestration.
pub mod query;
/// Cosine similarity scoring and top-K selection.
pub mod search;
/// Persistence abstraction for documents and chunks.
pub mod storage;
