use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::embedding::Embedder;
use crate::lexical::LexicalIndexCache;
use crate::vectordb::{ChunkPayload, VectorSearchBackend};

use super::model::Candidate;

/// Tuning knobs for hybrid retrieval.
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    /// Collection to search.
    pub collection: String,
    /// Candidates returned per query (and fetched per path).
    pub top_k: usize,
    /// Weight of the vector path in score fusion; the lexical path gets
    /// `1.0 - fusion_weight`.
    pub fusion_weight: f32,
}

impl RetrieverConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            collection: config.collection_name.clone(),
            top_k: config.retrieve_top_k,
            fusion_weight: config.fusion_weight,
        }
    }
}

/// Two-path retriever fusing vector similarity with BM25.
///
/// The vector store is the authoritative corpus: each query's vector hits
/// seed the lexical index pool, so the lexical path can only rank (and
/// resurface) chunks the vector store knows about. Upstream failures degrade
/// to an empty candidate list instead of propagating.
pub struct HybridRetriever<B: VectorSearchBackend> {
    backend: B,
    embedder: Arc<dyn Embedder>,
    lexical_cache: LexicalIndexCache,
    config: RetrieverConfig,
}

impl<B: VectorSearchBackend> std::fmt::Debug for HybridRetriever<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridRetriever")
            .field("collection", &self.config.collection)
            .field("top_k", &self.config.top_k)
            .field("fusion_weight", &self.config.fusion_weight)
            .finish_non_exhaustive()
    }
}

impl<B: VectorSearchBackend> HybridRetriever<B> {
    pub fn new(
        backend: B,
        embedder: Arc<dyn Embedder>,
        lexical_cache: LexicalIndexCache,
        config: RetrieverConfig,
    ) -> Self {
        Self {
            backend,
            embedder,
            lexical_cache,
            config,
        }
    }

    /// Invalidates the cached lexical index for `policy_filter`, forcing a
    /// rebuild on the next query (e.g. after re-ingestion).
    pub fn invalidate_lexical(&self, policy_filter: Option<&str>) {
        self.lexical_cache.invalidate(policy_filter);
    }

    /// Retrieves up to `top_k` fused candidates for `query`.
    ///
    /// An empty query embedding or an unreachable upstream yields an empty
    /// list; callers treat that as "no evidence" rather than an error.
    #[instrument(skip(self), fields(collection = %self.config.collection))]
    pub async fn retrieve(&self, query: &str, policy_filter: Option<&str>) -> Vec<Candidate> {
        let embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "Query embedding failed, returning no candidates");
                return Vec::new();
            }
        };
        if embedding.is_empty() {
            debug!("Empty query embedding, returning no candidates");
            return Vec::new();
        }

        let hits = match self
            .backend
            .search(
                &self.config.collection,
                embedding,
                self.config.top_k as u64,
                policy_filter,
            )
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, "Vector search failed, returning no candidates");
                return Vec::new();
            }
        };
        if hits.is_empty() {
            debug!("Vector search returned no hits");
            return Vec::new();
        }

        let pool: Vec<ChunkPayload> = hits.iter().map(|h| h.payload.clone()).collect();
        let index = self.lexical_cache.get_or_build(policy_filter, &pool);
        let lexical_hits = index.search(query, self.config.top_k, policy_filter);

        debug!(
            vector_hits = hits.len(),
            lexical_hits = lexical_hits.len(),
            "Fusing retrieval paths"
        );

        // Merge on (url, page): vector candidates first in rank order, then
        // lexical-only candidates appended in rank order.
        let mut candidates: Vec<Candidate> = Vec::with_capacity(hits.len() + lexical_hits.len());
        let mut by_key: HashMap<u64, usize> = HashMap::with_capacity(hits.len());

        for hit in hits {
            let candidate = Candidate::from_vector(hit.payload, hit.score);
            let key = candidate.doc_key();
            if let Some(&idx) = by_key.get(&key) {
                // Duplicate (url, page) from the vector store keeps the best score.
                if candidate.vector_score > candidates[idx].vector_score {
                    candidates[idx].vector_score = candidate.vector_score;
                }
                continue;
            }
            by_key.insert(key, candidates.len());
            candidates.push(candidate);
        }

        for hit in lexical_hits {
            let candidate = Candidate::from_lexical(hit.chunk, hit.score);
            let key = candidate.doc_key();
            match by_key.get(&key) {
                Some(&idx) => candidates[idx].lexical_score = hit.score,
                None => {
                    by_key.insert(key, candidates.len());
                    candidates.push(candidate);
                }
            }
        }

        fuse_scores(&mut candidates, self.config.fusion_weight);

        // Stable sort: equal fused scores keep vector-path order.
        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(self.config.top_k);
        candidates
    }
}

/// Max-normalizes each path independently, then combines them as
/// `w * vector + (1 - w) * lexical`.
pub(super) fn fuse_scores(candidates: &mut [Candidate], fusion_weight: f32) {
    let max_vector = candidates
        .iter()
        .map(|c| c.vector_score)
        .fold(0.0f32, f32::max);
    let max_lexical = candidates
        .iter()
        .map(|c| c.lexical_score)
        .fold(0.0f32, f32::max);

    for candidate in candidates {
        let norm_vector = if max_vector > 0.0 {
            candidate.vector_score / max_vector
        } else {
            0.0
        };
        let norm_lexical = if max_lexical > 0.0 {
            candidate.lexical_score / max_lexical
        } else {
            0.0
        };
        candidate.score = fusion_weight * norm_vector + (1.0 - fusion_weight) * norm_lexical;
    }
}
