use std::sync::Arc;

use crate::application::ports::{
    ClassifierError, Embedder, EmbedderError, SpamClassifier, SpamPrediction,
};
use crate::domain::SpamLabel;

use super::input::{InputError, SPAM_EMPTY_WARNING, require_text};

pub struct SpamService {
    embedder: Arc<dyn Embedder>,
    classifier: Arc<dyn SpamClassifier>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpamVerdict {
    pub label: SpamLabel,
    pub spam_probability: f32,
    pub message: &'static str,
}

impl From<SpamPrediction> for SpamVerdict {
    fn from(prediction: SpamPrediction) -> Self {
        Self {
            label: prediction.label,
            spam_probability: prediction.spam_probability,
            message: prediction.label.verdict_message(),
        }
    }
}

impl SpamService {
    pub fn new(embedder: Arc<dyn Embedder>, classifier: Arc<dyn SpamClassifier>) -> Self {
        Self {
            embedder,
            classifier,
        }
    }

    #[tracing::instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn classify(&self, text: &str) -> Result<SpamVerdict, SpamError> {
        // Untrimmed text is embedded; trimming only decides emptiness.
        require_text(text, SPAM_EMPTY_WARNING)?;

        let embedding = self.embedder.embed(text).await?;
        let prediction = self.classifier.predict(&embedding)?;

        tracing::info!(
            label = %prediction.label,
            spam_probability = prediction.spam_probability,
            "Email classified"
        );

        Ok(prediction.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpamError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("embedding: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("classification: {0}")]
    Classification(#[from] ClassifierError),
}
