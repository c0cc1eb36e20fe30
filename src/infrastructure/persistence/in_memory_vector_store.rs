use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{
    CollectionConfig, SearchResult, VectorStore, VectorStoreError,
};
use crate::domain::{Chunk, ChunkId, Embedding};

struct StoredPoint {
    chunk: Chunk,
    embedding: Embedding,
}

#[derive(Default)]
struct Collection {
    dimensions: Option<u64>,
    points: Vec<StoredPoint>,
    /// Position of each chunk in `points`.
    positions: HashMap<ChunkId, usize>,
}

/// Brute-force cosine search over points held in memory.
#[derive(Default)]
pub struct InMemoryVectorStore {
    collection: RwLock<Option<Collection>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.collection
            .read()
            .await
            .as_ref()
            .map_or(0, |c| c.points.len())
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, config: &CollectionConfig) -> Result<bool, VectorStoreError> {
        let mut collection = self.collection.write().await;
        if collection.is_some() {
            return Ok(false);
        }
        *collection = Some(Collection {
            dimensions: Some(config.vector_dimensions),
            ..Collection::default()
        });
        tracing::info!(dimensions = config.vector_dimensions, "In-memory collection created");
        Ok(true)
    }

    async fn collection_exists(&self) -> Result<bool, VectorStoreError> {
        Ok(self.collection.read().await.is_some())
    }

    async fn upsert(
        &self,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError> {
        if chunks.len() != embeddings.len() {
            return Err(VectorStoreError::UpsertFailed(
                "chunks and embeddings count mismatch".to_string(),
            ));
        }

        let mut guard = self.collection.write().await;
        let collection = guard.get_or_insert_with(Collection::default);

        let mismatch = collection.dimensions.and_then(|expected| {
            embeddings
                .iter()
                .find(|e| e.dimensions() as u64 != expected)
                .map(|bad| (bad.dimensions(), expected))
        });
        if let Some((actual, expected)) = mismatch {
            return Err(VectorStoreError::UpsertFailed(format!(
                "vector has {} dimensions, collection expects {}",
                actual, expected
            )));
        }

        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            let point = StoredPoint {
                chunk: chunk.clone(),
                embedding: embedding.clone(),
            };
            match collection.positions.get(&chunk.id).copied() {
                Some(position) => collection.points[position] = point,
                None => {
                    collection.positions.insert(chunk.id, collection.points.len());
                    collection.points.push(point);
                }
            }
        }

        tracing::debug!(count = chunks.len(), total = collection.points.len(), "Points upserted");
        Ok(())
    }

    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        let guard = self.collection.read().await;
        let Some(collection) = guard.as_ref() else {
            return Ok(Vec::new());
        };

        let mut results: Vec<SearchResult> = collection
            .points
            .iter()
            .map(|point| SearchResult {
                chunk: point.chunk.clone(),
                score: embedding.cosine_similarity(&point.embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(top_k);
        Ok(results)
    }
}
