//! Embedding collaborator boundary.
//!
//! The pipeline treats embedding as a black box: any service that maps text to
//! a fixed-length float vector. [`RemoteEmbedder`] calls such a service over
//! HTTP; [`StubEmbedder`] is a deterministic hashed bag-of-words embedder used
//! in tests and when no model endpoint is configured.

pub mod error;


pub use error::EmbeddingError;

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::hashing::hash_to_u64;

/// Default dimension for the stub embedder.
pub const STUB_EMBEDDING_DIM: usize = 64;

const REMOTE_EMBED_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
/// Maps text to a fixed-length float vector.
pub trait Embedder: Send + Sync {
    /// Embeds one text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Output dimension of this embedder.
    fn dim(&self) -> usize;
}

/// Deterministic hashed bag-of-words embedder.
///
/// Tokens are hashed into a fixed number of buckets and the resulting counts
/// are L2-normalized, so texts sharing vocabulary land close in cosine space.
/// Not a real semantic model; good enough to exercise ranking logic.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dim: usize,
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new(STUB_EMBEDDING_DIM)
    }
}

impl StubEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];

        for token in text.to_lowercase().split(|c: char| !c.is_alphanumeric()) {
            if token.len() < 2 {
                continue;
            }
            let bucket = (hash_to_u64(token.as_bytes()) % self.dim as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_sync(text))
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

/// HTTP embedder calling an external embedding service.
///
/// Expects `POST {url}` with body `{"text": "..."}` and a response of
/// `{"embedding": [f32; dim]}`.
pub struct RemoteEmbedder {
    http: reqwest::Client,
    url: String,
    dim: usize,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl RemoteEmbedder {
    pub fn new(url: impl Into<String>, dim: usize) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REMOTE_EMBED_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            url: url.into(),
            dim,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let response = self
            .http
            .post(&self.url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(EmbeddingError::RequestFailed {
                url: self.url.clone(),
                message: format!("status {}", response.status()),
            });
        }

        let body: EmbedResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    message: e.to_string(),
                })?;

        if body.embedding.len() != self.dim {
            return Err(EmbeddingError::InvalidDimension {
                expected: self.dim,
                actual: body.embedding.len(),
            });
        }

        Ok(body.embedding)
    }

    fn dim(&self) -> usize {
        self.dim
    }
}
