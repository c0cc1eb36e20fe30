use std::sync::Arc;

use crate::application::ports::Embedder;
use crate::presentation::config::{EmbeddingProvider, EmbeddingsSettings};

use crate::infrastructure::llm::{LocalCandleEmbedder, OpenAiEmbedder};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub struct EmbedderFactory;

#[derive(Debug, thiserror::Error)]
pub enum EmbedderFactoryError {
    #[error("missing API key: OpenAI embedder requires an API key")]
    MissingApiKey,
    #[error("model initialization failed: {0}")]
    InitializationFailed(String),
}

impl EmbedderFactory {
    /// Embedder for retrieval; local vectors are L2-normalised.
    pub fn create(
        settings: &EmbeddingsSettings,
        api_key: Option<String>,
    ) -> Result<Arc<dyn Embedder>, EmbedderFactoryError> {
        match settings.provider {
            EmbeddingProvider::Local => Self::create_local(&settings.model, true),
            EmbeddingProvider::OpenAi => {
                let key = api_key
                    .filter(|k| !k.is_empty())
                    .ok_or(EmbedderFactoryError::MissingApiKey)?;
                let base_url = settings.base_url.as_deref().unwrap_or(OPENAI_BASE_URL);
                tracing::info!(model = %settings.model, base_url, "Loading OpenAI embedding model");
                Ok(Arc::new(
                    OpenAiEmbedder::new(base_url, key, settings.model.clone())
                        .with_dimension(settings.dimension),
                ))
            }
        }
    }

    pub fn create_local(
        model: &str,
        normalize: bool,
    ) -> Result<Arc<dyn Embedder>, EmbedderFactoryError> {
        tracing::info!(model, normalize, "Loading local Candle embedding model");
        let embedder = LocalCandleEmbedder::new(model, normalize)
            .map_err(|e| EmbedderFactoryError::InitializationFailed(e.to_string()))?;
        Ok(Arc::new(embedder))
    }
}
