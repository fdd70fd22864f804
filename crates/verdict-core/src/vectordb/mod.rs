//! Qdrant vector database integration.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{QdrantSearchClient, VectorSearchBackend};
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockVectorSearch, cosine_similarity};
pub use model::{ChunkHit, ChunkPayload, ChunkPoint};
