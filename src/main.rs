use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use demohub::application::ports::{ConversationRepository, VectorStore};
use demohub::application::services::{
    CodeReviewService, SpamService, SubtitleIngestionService, SubtitleSearchService,
    SupportChatService, SupportGraph,
};
use demohub::infrastructure::audio::OpenAiWhisperEngine;
use demohub::infrastructure::billing::HttpBillingGateway;
use demohub::infrastructure::classifier::LogisticRegressionClassifier;
use demohub::infrastructure::llm::{EmbedderFactory, create_llm_client};
use demohub::infrastructure::observability::{TracingConfig, init_tracing};
use demohub::infrastructure::persistence::{
    InMemoryConversationRepository, InMemoryVectorStore, QdrantAdapter,
};
use demohub::infrastructure::text_processing::{RecursiveCharacterSplitter, SrtLoader};
use demohub::presentation::config::{EmbeddingProvider, VectorStoreBackend};
use demohub::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(
        "demohub",
        environment,
        &settings.logging,
    ));

    let api_key = settings
        .llm
        .resolve_api_key()
        .context("Failed to resolve the model API key")?;

    // Spam classifier
    let spam_embedder = EmbedderFactory::create_local(&settings.spam.embedding_model, false)?;
    let classifier = LogisticRegressionClassifier::from_file(&settings.spam.classifier_path)
        .with_context(|| {
            format!(
                "Failed to load spam classifier from {}",
                settings.spam.classifier_path
            )
        })?;
    let spam_service = Arc::new(SpamService::new(spam_embedder, Arc::new(classifier)));

    // Code reviewer
    let review_llm = create_llm_client(&settings.llm, &settings.code_review.chat_model)?;
    let code_review_service = Arc::new(CodeReviewService::new(Arc::new(review_llm)));

    // Subtitle search and ingestion
    let embedder_key = match settings.embeddings.provider {
        EmbeddingProvider::OpenAi => Some(api_key.clone()),
        EmbeddingProvider::Local => None,
    };
    let embedder = EmbedderFactory::create(&settings.embeddings, embedder_key)?;

    let vector_store: Arc<dyn VectorStore> = match settings.vector_store.backend {
        VectorStoreBackend::Qdrant => {
            let adapter = QdrantAdapter::new(
                &settings.vector_store.url,
                settings.vector_store.collection_name.clone(),
            )?;
            adapter.collection_exists().await.with_context(|| {
                format!("Qdrant is not reachable at {}", settings.vector_store.url)
            })?;
            Arc::new(adapter)
        }
        VectorStoreBackend::Memory => {
            tracing::warn!("Using the in-memory vector store; ingested subtitles are not persisted");
            Arc::new(InMemoryVectorStore::new())
        }
    };

    let transcription_engine = Arc::new(
        OpenAiWhisperEngine::new(
            api_key.clone(),
            settings.transcription.base_url.clone(),
            Some(settings.transcription.model.clone()),
        )
        .with_max_file_size_mb(settings.transcription.max_file_size_mb),
    );

    let search_llm = create_llm_client(&settings.llm, &settings.subtitles.chat_model)?;
    let subtitle_search_service = Arc::new(SubtitleSearchService::new(
        Arc::clone(&embedder),
        Arc::new(search_llm),
        Arc::clone(&vector_store),
        transcription_engine,
        settings.subtitles.max_context_tokens,
    ));

    let subtitle_ingestion_service = Arc::new(SubtitleIngestionService::new(
        Arc::new(SrtLoader),
        embedder,
        vector_store,
        Arc::new(RecursiveCharacterSplitter::new(
            settings.subtitles.chunk_size,
            settings.subtitles.chunk_overlap,
        )),
    ));

    // Support chatbot
    let support_llm = create_llm_client(&settings.llm, &settings.support.chat_model)?;
    let billing_gateway = Arc::new(
        HttpBillingGateway::new(settings.support.billing_api_url.clone())
            .context("Failed to build billing API client")?,
    );
    let graph = Arc::new(SupportGraph::new(Arc::new(support_llm), billing_gateway));
    let repository: Arc<dyn ConversationRepository> =
        Arc::new(InMemoryConversationRepository::new());
    let support_chat_service = Arc::new(SupportChatService::new(
        graph,
        repository,
        settings.support.history_limit,
    ));

    let state = AppState {
        spam_service,
        code_review_service,
        subtitle_search_service,
        subtitle_ingestion_service,
        support_chat_service,
        recording: settings.recording.clone(),
    };

    let router = create_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(environment = %environment, "Listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
