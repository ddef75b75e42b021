//! HTTP surface for DocRAG.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /documents` – Upload a PDF (multipart `file` part). Stores the raw
//!   bytes, persists the document record, and detaches a processing run.
//!   Returns the created document with its initial `Uploaded` status.
//! - `GET /documents` – List documents with their processing status, newest
//!   upload first.
//! - `POST /documents/process` – Re-trigger processing for a document;
//!   fire-and-forget, always `202 Accepted`.
//! - `POST /query` – Answer a question grounded in the processed corpus.
//!   Always returns a `QueryResponse` once the question validates; internal
//!   failures are embedded in the answer body, never surfaced as HTTP faults.
//! - `GET /metrics` – Observe pipeline and query counters.
//!
//! Background processing failures never surface here; they are visible only
//! as a document's `Failed` status in listings.

use crate::config::get_config;
use crate::models::{Document, QueryRequest, QueryResponse};
use crate::processing::{DocumentApi, UploadError};
use crate::query::QueryApi;
use crate::storage::StorageError;
use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;

/// Content type accepted for uploads.
const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Shared handler state: the document surface and the query surface.
#[derive(Clone)]
pub struct AppState {
    /// Upload, listing, and processing triggers.
    pub documents: Arc<dyn DocumentApi>,
    /// Question answering.
    pub query: Arc<dyn QueryApi>,
}

/// Build the HTTP router exposing the document and query API surface.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/documents", post(upload_document).get(list_documents))
        .route("/documents/process", post(process_document))
        .route("/query", post(run_query))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

/// Accept a PDF upload and detach its processing run.
async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Document>, AppError> {
    let mut upload: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::Validation(format!("Invalid multipart payload: {err}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("document.pdf").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::Validation(format!("Failed to read upload: {err}")))?;
        upload = Some((file_name, content_type, bytes.to_vec()));
        break;
    }

    let Some((file_name, content_type, bytes)) = upload else {
        return Err(AppError::Validation("No file provided".to_string()));
    };
    if bytes.is_empty() {
        return Err(AppError::Validation("No file provided".to_string()));
    }
    if !content_type.eq_ignore_ascii_case(PDF_CONTENT_TYPE) {
        return Err(AppError::Validation(
            "Only PDF files are supported".to_string(),
        ));
    }

    let document = state.documents.upload(&file_name, &content_type, bytes).await?;
    tracing::info!(
        document_id = %document.id,
        file_name = %document.file_name,
        "Upload accepted"
    );
    Ok(Json(document))
}

/// List documents, newest upload first.
async fn list_documents(State(state): State<AppState>) -> Result<Json<Vec<Document>>, AppError> {
    let documents = state.documents.list_documents().await?;
    Ok(Json(documents))
}

/// Request body for `POST /documents/process`.
#[derive(Deserialize)]
struct ProcessDocumentRequest {
    /// Identifier of the document to reprocess.
    document_id: String,
}

/// Re-trigger processing for a document; fire-and-forget.
async fn process_document(
    State(state): State<AppState>,
    Json(request): Json<ProcessDocumentRequest>,
) -> StatusCode {
    state.documents.queue_processing(request.document_id);
    StatusCode::ACCEPTED
}

/// Answer a question grounded in the processed corpus.
async fn run_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    if request.question.trim().is_empty() {
        return Err(AppError::Validation("Question is required".to_string()));
    }

    let config = get_config();
    let max_results = request
        .max_results
        .unwrap_or(config.query_default_max_results)
        .clamp(1, config.query_max_results);

    let response = state.query.answer(&request.question, max_results).await;
    Ok(Json(response))
}

/// Return pipeline and query counters.
async fn get_metrics(
    State(state): State<AppState>,
) -> Json<crate::metrics::MetricsSnapshot> {
    Json(state.documents.metrics_snapshot())
}

enum AppError {
    Validation(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Self::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}

impl From<UploadError> for AppError {
    fn from(inner: UploadError) -> Self {
        Self::Internal(inner.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(inner: StorageError) -> Self {
        Self::Internal(inner.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CONFIG, Config};
    use crate::metrics::MetricsSnapshot;
    use crate::models::{ProcessingStatus, SourceChunk};
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::json;
    use std::sync::{Arc, Mutex, Once};
    use time::OffsetDateTime;
    use tower::ServiceExt;

    fn ensure_test_config() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = CONFIG.set(Config {
                gemini_api_key: "test-key".into(),
                gemini_base_url: "http://127.0.0.1:0".into(),
                embedding_model: "test-embedding".into(),
                embedding_dimension: 8,
                generation_model: "test-generation".into(),
                provider_timeout_secs: 5,
                chunk_size: 1000,
                chunk_overlap_words: 200,
                upload_dir: "uploads".into(),
                server_port: None,
                query_default_max_results: 5,
                query_max_results: 20,
            });
        });
    }

    #[derive(Clone, Debug)]
    struct UploadCall {
        file_name: String,
        content_type: String,
        bytes: usize,
    }

    #[derive(Default)]
    struct StubDocumentService {
        uploads: Mutex<Vec<UploadCall>>,
        queued: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DocumentApi for StubDocumentService {
        async fn upload(
            &self,
            file_name: &str,
            content_type: &str,
            bytes: Vec<u8>,
        ) -> Result<Document, UploadError> {
            self.uploads.lock().unwrap().push(UploadCall {
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
                bytes: bytes.len(),
            });
            Ok(Document {
                id: "doc-1".to_string(),
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
                size_bytes: bytes.len() as u64,
                uploaded_at: OffsetDateTime::UNIX_EPOCH,
                status: ProcessingStatus::Uploaded,
            })
        }

        async fn list_documents(&self) -> Result<Vec<Document>, StorageError> {
            Ok(Vec::new())
        }

        fn queue_processing(&self, document_id: String) {
            self.queued.lock().unwrap().push(document_id);
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            crate::metrics::ServiceMetrics::new().snapshot()
        }
    }

    #[derive(Default)]
    struct StubQueryService {
        calls: Mutex<Vec<(String, usize)>>,
    }

    #[async_trait]
    impl QueryApi for StubQueryService {
        async fn answer(&self, question: &str, max_results: usize) -> QueryResponse {
            self.calls
                .lock()
                .unwrap()
                .push((question.to_string(), max_results));
            QueryResponse {
                answer: "stub answer".to_string(),
                sources: vec![SourceChunk {
                    content: "chunk".to_string(),
                    file_name: "doc.pdf".to_string(),
                    similarity: 0.9,
                    chunk_index: 0,
                }],
                model: "stub-generation".to_string(),
            }
        }
    }

    fn make_app() -> (Router, Arc<StubDocumentService>, Arc<StubQueryService>) {
        ensure_test_config();
        let documents = Arc::new(StubDocumentService::default());
        let query = Arc::new(StubQueryService::default());
        let app = create_router(AppState {
            documents: documents.clone(),
            query: query.clone(),
        });
        (app, documents, query)
    }

    fn multipart_request(content_type: &str, payload: &str) -> Request<Body> {
        let boundary = "test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"report.pdf\"\r\n\
             Content-Type: {content_type}\r\n\r\n\
             {payload}\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method(Method::POST)
            .uri("/documents")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    #[tokio::test]
    async fn upload_accepts_pdf_and_returns_document() {
        let (app, documents, _) = make_app();

        let response = app
            .oneshot(multipart_request("application/pdf", "%PDF-1.4 fake"))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let document: Document = serde_json::from_slice(&body).unwrap();
        assert_eq!(document.file_name, "report.pdf");
        assert_eq!(document.status, ProcessingStatus::Uploaded);

        let uploads = documents.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].content_type, "application/pdf");
        assert!(uploads[0].bytes > 0);
    }

    #[tokio::test]
    async fn upload_rejects_non_pdf_content_type() {
        let (app, documents, _) = make_app();

        let response = app
            .oneshot(multipart_request("text/plain", "hello"))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(documents.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_rejects_missing_file_field() {
        let (app, documents, _) = make_app();
        let boundary = "test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"other\"\r\n\r\n\
             value\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/documents")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .expect("request");

        let response = app.oneshot(request).await.expect("router response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(documents.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn query_requires_a_question() {
        let (app, _, query) = make_app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/query")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "question": "   " }).to_string()))
            .expect("request");

        let response = app.oneshot(request).await.expect("router response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(query.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn query_clamps_max_results_and_returns_response() {
        let (app, _, query) = make_app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/query")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "question": "What is covered?", "max_results": 999 }).to_string(),
            ))
            .expect("request");

        let response = app.oneshot(request).await.expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: QueryResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.answer, "stub answer");
        assert_eq!(parsed.model, "stub-generation");

        let calls = query.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "What is covered?");
        assert_eq!(calls[0].1, 20);
    }

    #[tokio::test]
    async fn query_defaults_max_results_from_config() {
        let (app, _, query) = make_app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/query")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "question": "Anything?" }).to_string()))
            .expect("request");

        let response = app.oneshot(request).await.expect("router response");
        assert_eq!(response.status(), StatusCode::OK);

        let calls = query.calls.lock().unwrap();
        assert_eq!(calls[0].1, 5);
    }

    #[tokio::test]
    async fn process_trigger_is_fire_and_forget() {
        let (app, documents, _) = make_app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/documents/process")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "document_id": "doc-42" }).to_string()))
            .expect("request");

        let response = app.oneshot(request).await.expect("router response");

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(*documents.queued.lock().unwrap(), vec!["doc-42".to_string()]);
    }

    #[tokio::test]
    async fn metrics_endpoint_returns_snapshot() {
        let (app, _, _) = make_app();

        let request = Request::builder()
            .method(Method::GET)
            .uri("/metrics")
            .body(Body::empty())
            .expect("request");

        let response = app.oneshot(request).await.expect("router response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["documents_processed"], 0);
        assert_eq!(parsed["queries_answered"], 0);
    }
}
