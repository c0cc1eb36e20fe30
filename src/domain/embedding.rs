#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub values: Vec<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    /// Dot product with a weight vector of the same length.
    pub fn dot(&self, weights: &[f32]) -> Option<f32> {
        if self.values.len() != weights.len() {
            return None;
        }
        Some(self.values.iter().zip(weights).map(|(a, b)| a * b).sum())
    }

    pub fn cosine_similarity(&self, other: &Self) -> f32 {
        let Some(dot_product) = self.dot(&other.values) else {
            return 0.0;
        };

        let magnitude_a: f32 = self.values.iter().map(|x| x * x).sum::<f32>().sqrt();
        let magnitude_b: f32 = other.values.iter().map(|x| x * x).sum::<f32>().sqrt();

        if magnitude_a == 0.0 || magnitude_b == 0.0 {
            return 0.0;
        }

        dot_product / (magnitude_a * magnitude_b)
    }
}
