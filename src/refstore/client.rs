use qdrant_client::Qdrant;
use qdrant_client::qdrant::{Condition, Filter, ScrollPointsBuilder};

use super::error::RefStoreError;
use super::model::ReferenceEmbedding;
use super::{MAX_REFS_PER_BUILDING, REFERENCE_COLLECTION_NAME};

/// Minimal async interface to the reference-embedding store.
pub trait ReferenceStore: Send + Sync {
    /// Fetches all reference embeddings captured for one building.
    fn embeddings_for(
        &self,
        building_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ReferenceEmbedding>, RefStoreError>> + Send;
}

#[derive(Clone)]
/// Qdrant-backed reference store.
pub struct QdrantReferenceStore {
    client: Qdrant,
    url: String,
    collection: String,
}

impl QdrantReferenceStore {
    /// Creates a store client for `url` using the default collection.
    pub async fn new(url: &str) -> Result<Self, RefStoreError> {
        Self::with_collection(url, REFERENCE_COLLECTION_NAME).await
    }

    /// Creates a store client for `url` reading from `collection`.
    pub async fn with_collection(url: &str, collection: &str) -> Result<Self, RefStoreError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| RefStoreError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.to_string(),
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), RefStoreError> {
        self.client
            .health_check()
            .await
            .map_err(|e| RefStoreError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

impl ReferenceStore for QdrantReferenceStore {
    async fn embeddings_for(
        &self,
        building_id: i64,
    ) -> Result<Vec<ReferenceEmbedding>, RefStoreError> {
        let filter = Filter::must([Condition::matches("building_id", building_id)]);

        let response = self
            .client
            .scroll(
                ScrollPointsBuilder::new(&self.collection)
                    .filter(filter)
                    .limit(MAX_REFS_PER_BUILDING)
                    .with_payload(true)
                    .with_vectors(true),
            )
            .await
            .map_err(|e| RefStoreError::LookupFailed {
                building_id,
                message: e.to_string(),
            })?;

        Ok(response
            .result
            .into_iter()
            .filter_map(ReferenceEmbedding::from_retrieved_point)
            .collect())
    }
}
