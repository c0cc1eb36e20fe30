use std::path::Path;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

pub const AZURE_API_VERSION: &str = "2024-06-01";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub embeddings: EmbeddingsSettings,
    pub vector_store: VectorStoreSettings,
    pub spam: SpamSettings,
    pub code_review: CodeReviewSettings,
    pub subtitles: SubtitlesSettings,
    pub transcription: TranscriptionSettings,
    pub recording: RecordingSettings,
    pub support: SupportSettings,
    pub billing_api: BillingApiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "lmstudio")]
    LmStudio,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub azure_endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    /// File holding the key, read when `api_key` is unset.
    #[serde(default)]
    pub api_key_file: Option<String>,
    pub max_tokens: usize,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

impl LlmSettings {
    pub fn resolve_api_key(&self) -> Result<String, SettingsError> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.trim().to_string());
        }

        match self.api_key_file.as_deref() {
            Some(path) => read_key_file(Path::new(path)),
            None if self.provider == LlmProvider::LmStudio => Ok(String::new()),
            None => Err(SettingsError::MissingApiKey),
        }
    }
}

fn read_key_file(path: &Path) -> Result<String, SettingsError> {
    let contents = std::fs::read_to_string(path).map_err(|e| SettingsError::KeyFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let key = contents.trim();
    if key.is_empty() {
        return Err(SettingsError::KeyFile {
            path: path.display().to_string(),
            reason: "file is empty".to_string(),
        });
    }
    Ok(key.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    Local,
    #[serde(rename = "openai")]
    OpenAi,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsSettings {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub dimension: usize,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorStoreBackend {
    Qdrant,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VectorStoreSettings {
    pub backend: VectorStoreBackend,
    pub url: String,
    pub collection_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpamSettings {
    pub embedding_model: String,
    pub classifier_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeReviewSettings {
    pub chat_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubtitlesSettings {
    pub chat_model: String,
    pub max_context_tokens: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub model: String,
    #[serde(default)]
    pub base_url: Option<String>,
    pub max_file_size_mb: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordingSettings {
    pub sample_rate: u32,
    pub channels: u16,
    pub max_duration_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupportSettings {
    pub chat_model: String,
    pub history_limit: usize,
    pub billing_api_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillingApiSettings {
    pub host: String,
    pub port: u16,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("no API key configured: set llm.api_key or llm.api_key_file")]
    MissingApiKey,
    #[error("cannot read API key file {path}: {reason}")]
    KeyFile { path: String, reason: String },
}

impl Settings {
    /// Layers `appsettings.toml`, `appsettings.{env}.toml` and `APP__*` variables.
    pub fn load(environment: Environment) -> Result<Self, SettingsError> {
        let configuration = Config::builder()
            .add_source(File::with_name("appsettings").required(false))
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.file_suffix()))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(configuration.try_deserialize()?)
    }
}
