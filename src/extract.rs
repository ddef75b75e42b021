//! Text extraction from raw document bytes.
//!
//! Extraction is best-effort: a malformed document yields an error (or empty
//! text), and the pipeline records the failure as a terminal document status
//! rather than propagating it. The PDF implementation delegates to the
//! `pdf-extract` crate, which concatenates per-page text.

use thiserror::Error;

/// Errors surfaced while extracting text from document bytes.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The PDF could not be parsed or rendered to text.
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),
}

/// Capability interface for turning raw document bytes into plain text.
pub trait TextExtractor: Send + Sync {
    /// Extract plain UTF-8 text from `bytes`; may legitimately return an
    /// empty string when the document carries no extractable text.
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// PDF text extractor backed by the `pdf-extract` crate.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|err| ExtractError::Pdf(err.to_string()))
    }
}
