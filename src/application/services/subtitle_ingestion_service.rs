use std::sync::Arc;

use crate::application::ports::{
    CollectionConfig, Embedder, EmbedderError, SubtitleLoader, SubtitleLoaderError, TextSplitter,
    TextSplitterError, VectorStore, VectorStoreError,
};
use crate::domain::{Chunk, DocumentId};

/// Builds the subtitle index the search service queries.
pub struct SubtitleIngestionService {
    loader: Arc<dyn SubtitleLoader>,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    text_splitter: Arc<dyn TextSplitter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionReport {
    pub document_id: DocumentId,
    pub chunks: usize,
}

impl SubtitleIngestionService {
    pub fn new(
        loader: Arc<dyn SubtitleLoader>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        text_splitter: Arc<dyn TextSplitter>,
    ) -> Self {
        Self {
            loader,
            embedder,
            vector_store,
            text_splitter,
        }
    }

    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn ingest(
        &self,
        data: &[u8],
        title: Option<&str>,
    ) -> Result<IngestionReport, IngestionError> {
        let document_id = DocumentId::new();
        let title = title.map(str::trim).filter(|t| !t.is_empty());

        let dialogue = self.loader.extract_dialogue(data).await?;
        let chunks = self
            .text_splitter
            .split(&dialogue, document_id, title)
            .await?;

        if chunks.is_empty() {
            return Ok(IngestionReport {
                document_id,
                chunks: 0,
            });
        }

        let chunks: Vec<Chunk> = chunks.into_iter().map(label_with_source).collect();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(IngestionError::Embedding(EmbedderError::InvalidResponse(
                format!(
                    "expected {} embeddings, got {}",
                    chunks.len(),
                    embeddings.len()
                ),
            )));
        }

        if !self.vector_store.collection_exists().await? {
            let dimensions = self
                .embedder
                .dimensions()
                .unwrap_or_else(|| embeddings[0].dimensions());
            self.vector_store
                .create_collection(&CollectionConfig::new(dimensions as u64))
                .await?;
        }

        self.vector_store.upsert(&chunks, &embeddings).await?;

        tracing::info!(
            document_id = %document_id.as_uuid(),
            title = title.unwrap_or("untitled"),
            chunks = chunks.len(),
            "Subtitle file indexed"
        );

        Ok(IngestionReport {
            document_id,
            chunks: chunks.len(),
        })
    }
}

/// Prefixes the title so retrieved context names the movie it came from.
fn label_with_source(mut chunk: Chunk) -> Chunk {
    if let Some(source) = &chunk.source {
        chunk.text = format!("{}\n{}", source, chunk.text);
    }
    chunk
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("subtitle loading: {0}")]
    Loading(#[from] SubtitleLoaderError),
    #[error("text splitting: {0}")]
    Splitting(#[from] TextSplitterError),
    #[error("embedding: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("storage: {0}")]
    Storage(#[from] VectorStoreError),
}
