use async_trait::async_trait;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, Distance, FieldType, PointId,
    PointStruct, ScoredPoint, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
    VectorsConfig, point_id::PointIdOptions,
};
use qdrant_client::{Payload, Qdrant};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::ports::{
    CollectionConfig, DistanceMetric, SearchResult, VectorStore, VectorStoreError,
};
use crate::domain::{Chunk, ChunkId, DocumentId, Embedding};

/// Subtitle chunks stored as Qdrant points with `text`, `source`,
/// `document_id` and `offset` in the payload.
pub struct QdrantAdapter {
    client: Arc<Qdrant>,
    collection_name: String,
}

impl QdrantAdapter {
    pub fn new(url: &str, collection_name: String) -> Result<Self, VectorStoreError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            collection_name,
        })
    }

    fn map_distance_metric(metric: &DistanceMetric) -> Distance {
        match metric {
            DistanceMetric::Cosine => Distance::Cosine,
            DistanceMetric::Euclidean => Distance::Euclid,
            DistanceMetric::DotProduct => Distance::Dot,
        }
    }

    /// Chunk fields go to the payload; the chunk id becomes the point id.
    pub fn to_point(chunk: &Chunk, embedding: &Embedding) -> Result<PointStruct, VectorStoreError> {
        let payload = Payload::try_from(serde_json::json!({
            "document_id": chunk.document_id.as_uuid().to_string(),
            "text": chunk.text,
            "source": chunk.source,
            "offset": chunk.offset,
        }))
        .map_err(|e| VectorStoreError::UpsertFailed(e.to_string()))?;

        Ok(PointStruct::new(
            PointId::from(chunk.id.as_uuid().to_string()),
            embedding.values.clone(),
            payload,
        ))
    }

    /// Rebuilds a chunk from a scored point; points without a UUID id,
    /// `document_id` or `text` are skipped.
    pub fn to_search_result(point: ScoredPoint) -> Option<SearchResult> {
        let payload = point.payload;

        let document_id = Uuid::parse_str(payload.get("document_id")?.as_str()?).ok()?;
        let chunk_id = match point.id?.point_id_options? {
            PointIdOptions::Uuid(uuid) => Uuid::parse_str(&uuid).ok()?,
            PointIdOptions::Num(_) => return None,
        };

        let text = payload.get("text")?.as_str()?.to_string();
        let source = payload
            .get("source")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        let offset = payload
            .get("offset")
            .and_then(|v| v.as_integer())
            .unwrap_or(0) as usize;

        Some(SearchResult {
            chunk: Chunk {
                id: ChunkId::from_uuid(chunk_id),
                text,
                document_id: DocumentId::from_uuid(document_id),
                source,
                offset,
            },
            score: point.score,
        })
    }
}

#[async_trait]
impl VectorStore for QdrantAdapter {
    #[instrument(skip(self, config), fields(collection = %self.collection_name))]
    async fn create_collection(&self, config: &CollectionConfig) -> Result<bool, VectorStoreError> {
        if self.collection_exists().await? {
            info!(collection = %self.collection_name, "collection already exists");
            return Ok(false);
        }

        let vectors_config = VectorsConfig::from(VectorParamsBuilder::new(
            config.vector_dimensions,
            Self::map_distance_metric(&config.distance_metric),
        ));

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection_name).vectors_config(vectors_config),
            )
            .await
            .map_err(|e| VectorStoreError::CollectionCreationFailed(e.to_string()))?;

        info!(collection = %self.collection_name, "collection_created");

        for field in &config.keyword_indexes {
            self.client
                .create_field_index(CreateFieldIndexCollectionBuilder::new(
                    &self.collection_name,
                    field,
                    FieldType::Keyword,
                ))
                .await
                .map_err(|e| VectorStoreError::PayloadIndexFailed(e.to_string()))?;

            info!(collection = %self.collection_name, field = %field, "payload_index_applied");
        }

        Ok(true)
    }

    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn collection_exists(&self) -> Result<bool, VectorStoreError> {
        self.client
            .collection_exists(&self.collection_name)
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))
    }

    #[instrument(skip(self, chunks, embeddings), fields(collection = %self.collection_name, count = chunks.len()))]
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

        let points = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| Self::to_point(chunk, embedding))
            .collect::<Result<Vec<_>, _>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, points).wait(true))
            .await
            .map_err(|e| VectorStoreError::UpsertFailed(e.to_string()))?;

        info!(collection = %self.collection_name, count = chunks.len(), "points_upserted");
        Ok(())
    }

    #[instrument(skip(self, embedding), fields(collection = %self.collection_name, top_k = top_k))]
    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        let search_result = self
            .client
            .search_points(
                SearchPointsBuilder::new(
                    &self.collection_name,
                    embedding.values.clone(),
                    top_k as u64,
                )
                .with_payload(true),
            )
            .await
            .map_err(|e| VectorStoreError::SearchFailed(e.to_string()))?;

        let results: Vec<SearchResult> = search_result
            .result
            .into_iter()
            .filter_map(Self::to_search_result)
            .collect();

        Ok(results)
    }
}
