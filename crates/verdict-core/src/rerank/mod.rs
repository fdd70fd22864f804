//! Second-stage precision reranking of the fused shortlist.

pub mod error;
pub mod reranker;
pub mod scorer;


pub use error::RerankError;
pub use reranker::{CrossEncoderReranker, RerankedCandidate};
pub use scorer::{RelevanceScorer, RemoteScorer, StubScorer};
