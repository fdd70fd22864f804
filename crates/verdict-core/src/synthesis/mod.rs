//! Answer synthesis collaborator boundary.
//!
//! Synthesis maps (query, evidence) to an answer draft. [`LlmSynthesizer`]
//! calls a chat model; [`ExtractiveSynthesizer`] is deterministic and picks
//! the evidence sentence that best covers the query, which keeps the guard
//! and gate logic testable without a model.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::SynthesisError;

use std::collections::HashSet;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lexical::tokenize;
use crate::rerank::RerankedCandidate;

/// A synthesized answer before guard evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerDraft {
    pub text: String,
    /// One-line direct answer, when the synthesizer can isolate one.
    pub direct_answer: Option<String>,
    pub key_points: Vec<String>,
}

#[async_trait]
/// Maps a query and ranked evidence to an answer draft.
pub trait AnswerSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        query: &str,
        evidence: &[RerankedCandidate],
    ) -> Result<AnswerDraft, SynthesisError>;
}

/// Deterministic extractive synthesizer.
///
/// Splits the top-ranked evidence into sentences and answers with the one
/// sharing the most tokens with the query. No generation, so the numeric
/// guard sees values verbatim from the evidence.
#[derive(Debug, Clone, Default)]
pub struct ExtractiveSynthesizer;

impl ExtractiveSynthesizer {
    fn best_sentence<'a>(query_tokens: &HashSet<String>, text: &'a str) -> Option<&'a str> {
        text.split_inclusive(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .max_by_key(|sentence| {
                tokenize(sentence)
                    .iter()
                    .filter(|t| query_tokens.contains(*t))
                    .count()
            })
    }
}

#[async_trait]
impl AnswerSynthesizer for ExtractiveSynthesizer {
    async fn synthesize(
        &self,
        query: &str,
        evidence: &[RerankedCandidate],
    ) -> Result<AnswerDraft, SynthesisError> {
        let top = evidence.first().ok_or(SynthesisError::EmptyAnswer)?;
        let query_tokens: HashSet<String> = tokenize(query).into_iter().collect();

        let sentence = Self::best_sentence(&query_tokens, &top.candidate.chunk.text)
            .ok_or(SynthesisError::EmptyAnswer)?;

        Ok(AnswerDraft {
            text: sentence.to_string(),
            direct_answer: Some(sentence.to_string()),
            key_points: evidence
                .iter()
                .skip(1)
                .take(2)
                .filter_map(|c| Self::best_sentence(&query_tokens, &c.candidate.chunk.text))
                .map(str::to_string)
                .collect(),
        })
    }
}

/// Synthesizer backed by a chat model.
///
/// The prompt pins the model to the supplied evidence; values it invents
/// anyway are caught downstream by the numeric guard.
pub struct LlmSynthesizer {
    client: Client,
    model: String,
}

impl std::fmt::Debug for LlmSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSynthesizer")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LlmSynthesizer {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    fn build_prompt(query: &str, evidence: &[RerankedCandidate]) -> String {
        let mut prompt = String::from(
            "Answer the question using only the evidence passages below. \
             Quote dates, amounts, and numbers exactly as written. \
             If the evidence does not answer the question, say so.\n\n",
        );
        for (i, item) in evidence.iter().enumerate() {
            prompt.push_str(&format!("Evidence {}:\n{}\n\n", i + 1, item.candidate.chunk.text));
        }
        prompt.push_str(&format!("Question: {query}\nAnswer:"));
        prompt
    }
}

#[async_trait]
impl AnswerSynthesizer for LlmSynthesizer {
    async fn synthesize(
        &self,
        query: &str,
        evidence: &[RerankedCandidate],
    ) -> Result<AnswerDraft, SynthesisError> {
        if evidence.is_empty() {
            return Err(SynthesisError::EmptyAnswer);
        }

        let prompt = Self::build_prompt(query, evidence);
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);

        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| SynthesisError::RequestFailed {
                message: e.to_string(),
            })?;

        let text = response
            .first_text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(SynthesisError::EmptyAnswer)?
            .to_string();

        debug!(model = %self.model, chars = text.len(), "Synthesized answer");
        Ok(AnswerDraft {
            text,
            direct_answer: None,
            key_points: Vec::new(),
        })
    }
}
