//! Document processing pipeline: extraction, chunking, embedding, and persistence.

pub mod chunking;
mod service;
pub mod types;

pub use service::{DocumentApi, DocumentService};
pub use types::UploadError;
