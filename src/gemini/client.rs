//! HTTP client wrapper for the Gemini embedding and generation endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::config::get_config;
use crate::embedding::{EmbeddingClient, EmbeddingError};
use crate::gemini::types::{EmbedContentResponse, GenerateContentResponse};
use crate::generation::{GenerationClient, GenerationError, GenerationOptions};

/// Lightweight HTTP client for the Gemini API.
///
/// A single instance serves both capability interfaces; the underlying
/// `reqwest::Client` applies the configured per-request timeout, so a hung
/// provider call surfaces as a transport error rather than stalling forever.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    embedding_model: String,
    embedding_dimension: usize,
    generation_model: String,
}

impl GeminiClient {
    /// Construct a new client using configuration derived from the environment.
    pub fn new() -> Result<Self, reqwest::Error> {
        let config = get_config();
        let client = Client::builder()
            .user_agent("docrag/0.1")
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build()?;
        let base_url = config.gemini_base_url.trim_end_matches('/').to_string();
        tracing::debug!(
            url = %base_url,
            embedding_model = %config.embedding_model,
            generation_model = %config.generation_model,
            timeout_secs = config.provider_timeout_secs,
            "Initialized Gemini HTTP client"
        );

        Ok(Self {
            client,
            base_url,
            api_key: config.gemini_api_key.clone(),
            embedding_model: config.embedding_model.clone(),
            embedding_dimension: config.embedding_dimension,
            generation_model: config.generation_model.clone(),
        })
    }

    fn model_url(&self, model: &str, operation: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, operation)
    }
}

#[async_trait]
impl EmbeddingClient for GeminiClient {
    fn model_name(&self) -> &str {
        &self.embedding_model
    }

    fn dims(&self) -> usize {
        self.embedding_dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = json!({
            "content": { "parts": [{ "text": text }] }
        });

        let response = self
            .client
            .post(self.model_url(&self.embedding_model, "embedContent"))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = EmbeddingError::UnexpectedStatus { status, body };
            tracing::error!(error = %error, "Embedding request rejected");
            return Err(error);
        }

        let payload: EmbedContentResponse = response.json().await?;
        if payload.embedding.values.is_empty() {
            return Err(EmbeddingError::MalformedResponse(
                "embedding values missing or empty".to_string(),
            ));
        }
        Ok(payload.embedding.values)
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    fn model_name(&self) -> &str {
        &self.generation_model
    }

    async fn generate(
        &self,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String, GenerationError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": options.temperature,
                "maxOutputTokens": options.max_output_tokens,
            }
        });

        let response = self
            .client
            .post(self.model_url(&self.generation_model, "generateContent"))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = GenerationError::UnexpectedStatus { status, body };
            tracing::error!(error = %error, "Generation request rejected");
            return Err(error);
        }

        let payload: GenerateContentResponse = response.json().await?;
        payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| {
                GenerationError::MalformedResponse("no candidate text in response".to_string())
            })
    }
}
