use async_trait::async_trait;

#[async_trait]
pub trait SubtitleLoader: Send + Sync {
    /// Extracts the spoken dialogue of a subtitle file as running text.
    async fn extract_dialogue(&self, data: &[u8]) -> Result<String, SubtitleLoaderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SubtitleLoaderError {
    #[error("subtitle file is not valid utf-8: {0}")]
    InvalidEncoding(String),
    #[error("no dialogue found in subtitle file")]
    NoDialogue,
}
