mod agent_graph;
mod billing_gateway;
mod collection_config;
mod conversation_repository;
mod embedder;
mod llm_client;
mod repository_error;
mod spam_classifier;
mod subtitle_loader;
mod text_splitter;
mod transcription_engine;
mod vector_store;
mod vector_store_error;

pub use agent_graph::{AgentError, AgentGraph, AgentState};
pub use billing_gateway::{BillingGateway, BillingGatewayError};
pub use collection_config::{CollectionConfig, DistanceMetric};
pub use conversation_repository::ConversationRepository;
pub use embedder::{Embedder, EmbedderError};
pub use llm_client::{ChatMessage, LlmClient, LlmClientError};
pub use repository_error::RepositoryError;
pub use spam_classifier::{ClassifierError, SpamClassifier, SpamPrediction};
pub use subtitle_loader::{SubtitleLoader, SubtitleLoaderError};
pub use text_splitter::{TextSplitter, TextSplitterError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
pub use vector_store::{SearchResult, VectorStore};
pub use vector_store_error::VectorStoreError;
