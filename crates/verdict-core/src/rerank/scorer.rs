use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::lexical::tokenize;

use super::error::RerankError;

const REMOTE_SCORE_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
/// Pairwise (query, passage) relevance scorer.
pub trait RelevanceScorer: Send + Sync {
    /// Scores each passage against the query. Returns one score per passage,
    /// in input order. Higher is more relevant.
    async fn score_pairs(&self, query: &str, passages: &[&str]) -> Result<Vec<f32>, RerankError>;
}

/// Deterministic token-overlap scorer for tests and offline use.
///
/// Scores a passage by the fraction of query tokens it contains. Crude next
/// to a real cross-encoder but it preserves "mentions more of the question
/// ranks higher", which is what the reranker contract needs exercised.
#[derive(Debug, Clone, Default)]
pub struct StubScorer;

#[async_trait]
impl RelevanceScorer for StubScorer {
    async fn score_pairs(&self, query: &str, passages: &[&str]) -> Result<Vec<f32>, RerankError> {
        let query_tokens: HashSet<String> = tokenize(query).into_iter().collect();
        if query_tokens.is_empty() {
            return Ok(vec![0.0; passages.len()]);
        }

        let scores = passages
            .iter()
            .map(|passage| {
                let passage_tokens: HashSet<String> = tokenize(passage).into_iter().collect();
                let overlap = query_tokens.intersection(&passage_tokens).count();
                overlap as f32 / query_tokens.len() as f32
            })
            .collect();

        Ok(scores)
    }
}

/// HTTP scorer calling an external cross-encoder service.
///
/// Expects `POST {url}` with body `{"query": "...", "passages": [...]}` and a
/// response of `{"scores": [f32]}` with one score per passage.
pub struct RemoteScorer {
    http: reqwest::Client,
    url: String,
}

#[derive(Deserialize)]
struct ScoreResponse {
    scores: Vec<f32>,
}

impl RemoteScorer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REMOTE_SCORE_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RelevanceScorer for RemoteScorer {
    async fn score_pairs(&self, query: &str, passages: &[&str]) -> Result<Vec<f32>, RerankError> {
        let response = self
            .http
            .post(&self.url)
            .json(&serde_json::json!({ "query": query, "passages": passages }))
            .send()
            .await
            .map_err(|e| RerankError::RequestFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(RerankError::RequestFailed {
                url: self.url.clone(),
                message: format!("status {}", response.status()),
            });
        }

        let body: ScoreResponse =
            response
                .json()
                .await
                .map_err(|e| RerankError::InvalidResponse {
                    message: e.to_string(),
                })?;

        if body.scores.len() != passages.len() {
            return Err(RerankError::ScoreCountMismatch {
                expected: passages.len(),
                actual: body.scores.len(),
            });
        }

        Ok(body.scores)
    }
}
