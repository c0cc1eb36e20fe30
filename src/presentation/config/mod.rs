mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AZURE_API_VERSION, BillingApiSettings, CodeReviewSettings, EmbeddingProvider,
    EmbeddingsSettings, LlmProvider, LlmSettings, LoggingSettings, RecordingSettings,
    ServerSettings, Settings, SettingsError, SpamSettings, SubtitlesSettings, SupportSettings,
    TranscriptionSettings, VectorStoreBackend, VectorStoreSettings,
};
