use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder,
};
use std::collections::HashMap;

use super::error::VectorDbError;
use super::model::{ChunkHit, ChunkPoint};

#[derive(Clone)]
/// Direct Qdrant client wrapper.
pub struct QdrantSearchClient {
    client: Qdrant,
    url: String,
}

impl QdrantSearchClient {
    /// Creates a client for `url`.
    pub async fn new(url: &str) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Creates a collection with cosine distance.
    pub async fn create_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> Result<(), VectorDbError> {
        let vectors_config = VectorParamsBuilder::new(vector_size, Distance::Cosine);

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(vectors_config)
                    .on_disk_payload(true),
            )
            .await
            .map_err(|e| VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    /// Ensures a collection exists (creates it if missing).
    pub async fn ensure_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> Result<(), VectorDbError> {
        let exists = self.client.collection_exists(name).await.map_err(|e| {
            VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            }
        })?;

        if !exists {
            self.create_collection(name, vector_size).await?;
        }

        Ok(())
    }

    /// Upserts chunk points into a collection.
    pub async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<ChunkPoint>,
    ) -> Result<(), VectorDbError> {
        if points.is_empty() {
            return Ok(());
        }

        let qdrant_points: Vec<PointStruct> = points
            .into_iter()
            .map(|p| {
                let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
                payload.insert("text".to_string(), p.payload.text.into());
                payload.insert("url".to_string(), p.payload.url.into());
                payload.insert("section".to_string(), p.payload.section.into());
                if let Some(policy_id) = p.payload.policy_id {
                    payload.insert("policy_id".to_string(), policy_id.into());
                }
                if let Some(page) = p.payload.page {
                    payload.insert("page".to_string(), (page as i64).into());
                }
                if let Some(language) = p.payload.language {
                    payload.insert("language".to_string(), language.into());
                }

                PointStruct::new(p.id, p.vector, payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, qdrant_points).wait(true))
            .await
            .map_err(|e| VectorDbError::UpsertFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    /// Searches a collection by vector similarity, optionally scoped to one policy.
    pub async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        policy_filter: Option<&str>,
    ) -> Result<Vec<ChunkHit>, VectorDbError> {
        let mut search_builder =
            SearchPointsBuilder::new(collection, query, limit).with_payload(true);

        if let Some(policy_id) = policy_filter {
            let filter = Filter::must([Condition::matches("policy_id", policy_id.to_string())]);
            search_builder = search_builder.filter(filter);
        }

        let search_result = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        let results = search_result
            .result
            .into_iter()
            .filter_map(ChunkHit::from_scored_point)
            .collect();

        Ok(results)
    }
}

/// Minimal async interface consumed by the hybrid retriever.
pub trait VectorSearchBackend: Send + Sync {
    /// Ensures a collection exists.
    fn ensure_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Upserts chunk points.
    fn upsert_points(
        &self,
        collection: &str,
        points: Vec<ChunkPoint>,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Searches for similar chunks.
    fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        policy_filter: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<ChunkHit>, VectorDbError>> + Send;
}

impl VectorSearchBackend for QdrantSearchClient {
    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        self.ensure_collection(name, vector_size).await
    }

    async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<ChunkPoint>,
    ) -> Result<(), VectorDbError> {
        self.upsert_points(collection, points).await
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        policy_filter: Option<&str>,
    ) -> Result<Vec<ChunkHit>, VectorDbError> {
        self.search(collection, query, limit, policy_filter).await
    }
}
