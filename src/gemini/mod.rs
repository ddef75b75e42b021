//! Gemini provider adapters.
//!
//! One HTTP client implements both capability interfaces: the
//! [`crate::embedding::EmbeddingClient`] contract via `models/{model}:embedContent`
//! and the [`crate::generation::GenerationClient`] contract via
//! `models/{model}:generateContent`.

mod client;
mod types;

pub use client::GeminiClient;
