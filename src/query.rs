//! Retrieval-augmented query orchestration.
//!
//! A query embeds the question, ranks all stored chunk vectors by cosine
//! similarity, assembles the best chunks into a labeled grounding context,
//! and asks the generation model to answer from that context alone. The
//! orchestrator never fails across its boundary: internal errors degrade
//! into a conversational answer labeled `"error"`, and the no-documents case
//! short-circuits with a canned answer labeled `"system"` before any
//! provider call is made.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::embedding::{EmbeddingClient, EmbeddingError};
use crate::generation::{GenerationClient, GenerationError, GenerationOptions};
use crate::metrics::ServiceMetrics;
use crate::models::{QueryResponse, SourceChunk};
use crate::search::top_k;
use crate::storage::{DocumentStore, StorageError};

/// Label for answers produced without invoking any provider.
const MODEL_LABEL_SYSTEM: &str = "system";
/// Label for degraded answers produced after an internal failure.
const MODEL_LABEL_ERROR: &str = "error";

const NO_DOCUMENTS_ANSWER: &str = "I don't have any processed documents to answer your question. \
     Please upload and wait for documents to be processed first.";

/// Generation settings for grounded answers: low temperature, bounded output.
const ANSWER_OPTIONS: GenerationOptions = GenerationOptions {
    temperature: 0.1,
    max_output_tokens: 1000,
};

/// Internal failures absorbed into a degraded answer.
#[derive(Debug, Error)]
enum QueryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Abstraction over query answering used by the HTTP surface and tests.
#[async_trait]
pub trait QueryApi: Send + Sync {
    /// Answer `question` grounded in up to `max_results` retrieved chunks.
    async fn answer(&self, question: &str, max_results: usize) -> QueryResponse;
}

/// Orchestrates retrieval and generation for a single question.
///
/// Stateless per request; any number of queries may run concurrently, since
/// chunk data at rest is never mutated after a processing run completes.
pub struct QueryService {
    store: Arc<dyn DocumentStore>,
    embedder: Arc<dyn EmbeddingClient>,
    generator: Arc<dyn GenerationClient>,
    metrics: Arc<ServiceMetrics>,
}

impl QueryService {
    /// Build a new query service from its collaborators.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        embedder: Arc<dyn EmbeddingClient>,
        generator: Arc<dyn GenerationClient>,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            store,
            embedder,
            generator,
            metrics,
        }
    }

    async fn try_answer(
        &self,
        question: &str,
        max_results: usize,
    ) -> Result<QueryResponse, QueryError> {
        // Check for candidates before embedding the question: answering
        // "I don't know" must not cost a provider call.
        let candidates = self.store.list_embedded_chunks().await?;
        if candidates.is_empty() {
            tracing::debug!("No embedded chunks stored; returning canned answer");
            return Ok(QueryResponse {
                answer: NO_DOCUMENTS_ANSWER.to_string(),
                sources: Vec::new(),
                model: MODEL_LABEL_SYSTEM.to_string(),
            });
        }

        let query_vector = self.embedder.embed(question).await?;
        let ranked = top_k(&query_vector, candidates, max_results);

        let context = ranked
            .iter()
            .map(|result| {
                format!(
                    "Source: {} (Chunk {})\nContent: {}",
                    result.chunk.document_name,
                    result.chunk.chunk.chunk_index,
                    result.chunk.chunk.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = build_prompt(&context, question);
        tracing::debug!(
            sources = ranked.len(),
            prompt_chars = prompt.len(),
            "Invoking generation"
        );

        let answer = self.generator.generate(&prompt, ANSWER_OPTIONS).await?;

        let sources = ranked
            .into_iter()
            .map(|result| SourceChunk {
                content: result.chunk.chunk.content,
                file_name: result.chunk.document_name,
                similarity: result.score,
                chunk_index: result.chunk.chunk.chunk_index,
            })
            .collect();

        Ok(QueryResponse {
            answer,
            sources,
            model: self.generator.model_name().to_string(),
        })
    }
}

#[async_trait]
impl QueryApi for QueryService {
    async fn answer(&self, question: &str, max_results: usize) -> QueryResponse {
        self.metrics.record_query();
        match self.try_answer(question, max_results).await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(error = %error, "Query failed; returning degraded answer");
                QueryResponse {
                    answer: format!(
                        "Sorry, I encountered an error processing your question: {error}"
                    ),
                    sources: Vec::new(),
                    model: MODEL_LABEL_ERROR.to_string(),
                }
            }
        }
    }
}

/// Fixed instruction preamble wrapped around the grounding context.
fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "You are a helpful assistant that answers questions based on the provided document context. \
         Use only the information from the context to answer the question. \
         If the answer cannot be found in the context, say so.\n\n\
         Context:\n{context}\n\n\
         Question: {question}\n\n\
         Answer:"
    )
}
