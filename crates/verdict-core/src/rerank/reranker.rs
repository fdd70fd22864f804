use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::retrieval::Candidate;

use super::scorer::RelevanceScorer;

/// A candidate after second-stage rescoring.
///
/// `cross_encoder_score` is authoritative for final ordering; the fused
/// retrieval score survives as `original_score` for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankedCandidate {
    pub candidate: Candidate,
    pub cross_encoder_score: f32,
    pub original_score: f32,
}

/// Precision reranker over the fused shortlist.
///
/// A failed or malformed scoring call degrades to an empty shortlist; the
/// pipeline then behaves as if no evidence was found.
pub struct CrossEncoderReranker {
    scorer: Arc<dyn RelevanceScorer>,
}

impl std::fmt::Debug for CrossEncoderReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossEncoderReranker").finish_non_exhaustive()
    }
}

impl CrossEncoderReranker {
    pub fn new(scorer: Arc<dyn RelevanceScorer>) -> Self {
        Self { scorer }
    }

    /// Rescores `candidates` against `query` and returns the best `top_n`,
    /// highest cross-encoder score first. Inputs shorter than `top_n` are
    /// returned whole; an empty input returns empty without calling out.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub async fn rerank(
        &self,
        query: &str,
        candidates: Vec<Candidate>,
        top_n: usize,
    ) -> Vec<RerankedCandidate> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let passages: Vec<&str> = candidates.iter().map(|c| c.chunk.text.as_str()).collect();
        let scores = match self.scorer.score_pairs(query, &passages).await {
            Ok(scores) if scores.len() == candidates.len() => scores,
            Ok(scores) => {
                warn!(
                    expected = candidates.len(),
                    actual = scores.len(),
                    "Scorer returned wrong score count, dropping shortlist"
                );
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "Cross-encoder scoring failed, dropping shortlist");
                return Vec::new();
            }
        };

        let mut reranked: Vec<RerankedCandidate> = candidates
            .into_iter()
            .zip(scores)
            .map(|(candidate, cross_encoder_score)| RerankedCandidate {
                original_score: candidate.score,
                candidate,
                cross_encoder_score,
            })
            .collect();

        // Stable sort keeps fused order for equal cross-encoder scores.
        reranked.sort_by(|a, b| {
            b.cross_encoder_score
                .partial_cmp(&a.cross_encoder_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        reranked.truncate(top_n);

        debug!(shortlist = reranked.len(), "Reranked candidates");
        reranked
    }
}
