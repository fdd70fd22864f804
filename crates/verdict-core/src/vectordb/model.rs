use qdrant_client::qdrant::ScoredPoint;
use qdrant_client::qdrant::point_id::PointIdOptions;
use serde::{Deserialize, Serialize};

/// Payload stored alongside each chunk vector.
///
/// Mirrors the metadata attached by the ingestion tooling (out of scope here):
/// chunk text plus enough provenance to cite it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkPayload {
    /// Raw chunk text.
    pub text: String,
    /// Identifier of the policy the chunk came from.
    pub policy_id: Option<String>,
    /// Source document URL.
    pub url: String,
    /// Page number within the source document.
    pub page: Option<u32>,
    /// Section label, empty when unknown.
    pub section: String,
    /// Detected language of the chunk, if recorded at ingest time.
    pub language: Option<String>,
}

/// A chunk vector plus payload, ready for upsert.
#[derive(Debug, Clone)]
pub struct ChunkPoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: ChunkPayload,
}

impl ChunkPoint {
    pub fn new(id: u64, vector: Vec<f32>, payload: ChunkPayload) -> Self {
        Self {
            id,
            vector,
            payload,
        }
    }
}

/// One scored hit from a similarity search.
#[derive(Debug, Clone)]
pub struct ChunkHit {
    pub id: u64,
    /// Cosine similarity reported by the index.
    pub score: f32,
    pub payload: ChunkPayload,
}

impl ChunkHit {
    /// Converts a Qdrant scored point, dropping points without a numeric id.
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let id = match point.id.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Num(n)) => n,
            _ => return None,
        };

        let payload = point.payload;

        let text = payload
            .get("text")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let policy_id = payload
            .get("policy_id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let url = payload
            .get("url")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let page = payload
            .get("page")
            .and_then(|v| v.as_integer())
            .and_then(|i| u32::try_from(i).ok());

        let section = payload
            .get("section")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let language = payload
            .get("language")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        Some(ChunkHit {
            id,
            score: point.score,
            payload: ChunkPayload {
                text,
                policy_id,
                url,
                page,
                section,
                language,
            },
        })
    }
}
