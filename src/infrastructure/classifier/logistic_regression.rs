use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::application::ports::{ClassifierError, SpamClassifier, SpamPrediction};
use crate::domain::{Embedding, SpamLabel};

/// Binary logistic regression exported as `{"coefficients": [...], "intercept": b}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionClassifier {
    coefficients: Vec<f32>,
    intercept: f32,
}

impl LogisticRegressionClassifier {
    pub fn new(coefficients: Vec<f32>, intercept: f32) -> Result<Self, ClassifierError> {
        if coefficients.is_empty() {
            return Err(ClassifierError::ArtifactLoadFailed(
                "classifier has no coefficients".to_string(),
            ));
        }
        Ok(Self {
            coefficients,
            intercept,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let artifact: Self = serde_json::from_str(json)
            .map_err(|e| ClassifierError::ArtifactLoadFailed(e.to_string()))?;
        Self::new(artifact.coefficients, artifact.intercept)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::ArtifactLoadFailed(format!("{}: {}", path.display(), e))
        })?;
        let classifier = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            dimensions = classifier.dimensions(),
            "Spam classifier loaded"
        );
        Ok(classifier)
    }

    pub fn dimensions(&self) -> usize {
        self.coefficients.len()
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

impl SpamClassifier for LogisticRegressionClassifier {
    fn predict(&self, embedding: &Embedding) -> Result<SpamPrediction, ClassifierError> {
        let score = embedding
            .dot(&self.coefficients)
            .ok_or(ClassifierError::DimensionMismatch {
                expected: self.coefficients.len(),
                actual: embedding.dimensions(),
            })?
            + self.intercept;

        let class_index = u8::from(score > 0.0);
        Ok(SpamPrediction {
            label: SpamLabel::from_class_index(class_index),
            spam_probability: sigmoid(score),
        })
    }
}
