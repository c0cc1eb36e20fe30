use async_trait::async_trait;

use super::{CollectionConfig, VectorStoreError};
use crate::domain::{Chunk, Embedding};

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub score: f32,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Returns `false` when the collection already existed.
    async fn create_collection(&self, config: &CollectionConfig) -> Result<bool, VectorStoreError>;

    async fn collection_exists(&self) -> Result<bool, VectorStoreError>;

    async fn upsert(
        &self,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError>;

    /// Best matches first.
    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError>;
}
