use crate::domain::{Embedding, SpamLabel};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpamPrediction {
    pub label: SpamLabel,
    /// Probability of the spam class.
    pub spam_probability: f32,
}

/// A trained classifier over sentence embeddings.
pub trait SpamClassifier: Send + Sync {
    fn predict(&self, embedding: &Embedding) -> Result<SpamPrediction, ClassifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("model artifact could not be loaded: {0}")]
    ArtifactLoadFailed(String),
    #[error("embedding has {actual} dimensions, classifier expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}
