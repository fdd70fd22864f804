//! Hybrid retrieval: vector similarity fused with BM25 over the same pool.
//!
//! Scores from the two paths live on different scales, so each path is
//! max-normalized independently before the weighted sum. Candidates are
//! deduplicated on `(url, page)` so one chunk surfaced by both paths is
//! scored once with both signals.

pub mod model;
pub mod retriever;


pub use model::Candidate;
pub use retriever::{HybridRetriever, RetrieverConfig};
