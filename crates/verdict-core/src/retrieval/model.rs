use serde::{Deserialize, Serialize};

use crate::hashing::hash_doc_key;
use crate::vectordb::ChunkPayload;

/// One retrievable unit of evidence with its ranking signals.
///
/// Identity is the `(url, page)` composite of the underlying chunk; a
/// candidate seen by only one retrieval path carries `0.0` for the other
/// path's score, never a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// The chunk and its provenance.
    pub chunk: ChunkPayload,
    /// Cosine similarity from the vector path.
    pub vector_score: f32,
    /// BM25 score from the lexical path.
    pub lexical_score: f32,
    /// Fused score in [0, 1] after normalization and weighting.
    pub score: f32,
}

impl Candidate {
    /// Creates a candidate discovered by the vector path.
    pub fn from_vector(chunk: ChunkPayload, vector_score: f32) -> Self {
        Self {
            chunk,
            vector_score,
            lexical_score: 0.0,
            score: 0.0,
        }
    }

    /// Creates a candidate discovered only by the lexical path.
    pub fn from_lexical(chunk: ChunkPayload, lexical_score: f32) -> Self {
        Self {
            chunk,
            vector_score: 0.0,
            lexical_score,
            score: 0.0,
        }
    }

    /// Stable identity key within a result set.
    pub fn doc_key(&self) -> u64 {
        hash_doc_key(&self.chunk.url, self.chunk.page)
    }
}
