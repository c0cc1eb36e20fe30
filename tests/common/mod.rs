#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use demohub::application::ports::{
    BillingGateway, BillingGatewayError, ChatMessage, ClassifierError, Embedder, EmbedderError,
    LlmClient, LlmClientError, SpamClassifier, SpamPrediction, TranscriptionEngine,
    TranscriptionError,
};
use demohub::application::services::{
    BillingService, CodeReviewService, SpamService, SubtitleIngestionService,
    SubtitleSearchService, SupportChatService, SupportGraph,
};
use demohub::domain::{BillingRecord, Embedding, SpamLabel};
use demohub::infrastructure::persistence::{InMemoryConversationRepository, InMemoryVectorStore};
use demohub::infrastructure::text_processing::{RecursiveCharacterSplitter, SrtLoader};
use demohub::presentation::AppState;
use demohub::presentation::config::RecordingSettings;

pub const TEST_DIMENSIONS: usize = 8;

/// Embeds text as letter counts folded into a few buckets.
pub struct LetterEmbedder {
    pub calls: AtomicUsize,
}

impl LetterEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn vector(text: &str) -> Embedding {
        let mut values = vec![0.0f32; TEST_DIMENSIONS];
        for ch in text.to_lowercase().chars().filter(|c| c.is_ascii_lowercase()) {
            values[(ch as usize - 'a' as usize) % TEST_DIMENSIONS] += 1.0;
        }
        Embedding::new(values)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Embedder for LetterEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn dimensions(&self) -> Option<usize> {
        Some(TEST_DIMENSIONS)
    }
}

/// Replies with queued answers in order, then repeats the fallback.
pub struct ScriptedLlmClient {
    replies: Mutex<VecDeque<Result<String, LlmClientError>>>,
    fallback: String,
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedLlmClient {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.to_string())).collect()),
            fallback: "ok".to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always(reply: &str) -> Self {
        Self {
            fallback: reply.to_string(),
            ..Self::new(Vec::new())
        }
    }

    pub fn failing() -> Self {
        let client = Self::new(Vec::new());
        client
            .replies
            .lock()
            .unwrap()
            .push_back(Err(LlmClientError::ApiRequestFailed("boom".to_string())));
        client
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> Vec<ChatMessage> {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmClientError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

pub struct FixedTranscriptionEngine {
    pub transcript: String,
    pub calls: AtomicUsize,
}

impl FixedTranscriptionEngine {
    pub fn new(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TranscriptionEngine for FixedTranscriptionEngine {
    async fn transcribe(&self, _audio_data: &[u8]) -> Result<String, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.transcript.clone())
    }
}

/// Treats long messages as spam: more than 30 letters in the embedding.
pub struct LengthClassifier {
    pub calls: AtomicUsize,
}

impl LengthClassifier {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SpamClassifier for LengthClassifier {
    fn predict(&self, embedding: &Embedding) -> Result<SpamPrediction, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let spam = embedding.values.iter().sum::<f32>() > 30.0;
        Ok(SpamPrediction {
            label: if spam { SpamLabel::Spam } else { SpamLabel::Ham },
            spam_probability: if spam { 0.9 } else { 0.1 },
        })
    }
}

pub enum GatewayBehaviour {
    Fixtures,
    Unreachable,
    Broken,
}

pub struct StubBillingGateway {
    behaviour: GatewayBehaviour,
    service: BillingService,
    pub lookups: Mutex<Vec<String>>,
}

impl StubBillingGateway {
    pub fn new(behaviour: GatewayBehaviour) -> Self {
        Self {
            behaviour,
            service: BillingService::with_fixtures(std::time::Duration::ZERO),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl BillingGateway for StubBillingGateway {
    async fn lookup(&self, user_id: &str) -> Result<Option<BillingRecord>, BillingGatewayError> {
        self.lookups.lock().unwrap().push(user_id.to_string());
        match self.behaviour {
            GatewayBehaviour::Fixtures => Ok(self.service.lookup(user_id).await),
            GatewayBehaviour::Unreachable => Err(BillingGatewayError::ConnectionFailed(
                "connection refused".to_string(),
            )),
            GatewayBehaviour::Broken => Err(BillingGatewayError::InvalidResponse(
                "unexpected payload".to_string(),
            )),
        }
    }
}

pub struct TestHarness {
    pub embedder: Arc<LetterEmbedder>,
    pub llm: Arc<ScriptedLlmClient>,
    pub vector_store: Arc<InMemoryVectorStore>,
    pub transcription: Arc<FixedTranscriptionEngine>,
    pub classifier: Arc<LengthClassifier>,
    pub gateway: Arc<StubBillingGateway>,
    pub conversations: Arc<InMemoryConversationRepository>,
}

impl TestHarness {
    pub fn new(llm: ScriptedLlmClient) -> Self {
        Self::with_gateway(llm, GatewayBehaviour::Fixtures)
    }

    pub fn with_gateway(llm: ScriptedLlmClient, behaviour: GatewayBehaviour) -> Self {
        Self {
            embedder: Arc::new(LetterEmbedder::new()),
            llm: Arc::new(llm),
            vector_store: Arc::new(InMemoryVectorStore::new()),
            transcription: Arc::new(FixedTranscriptionEngine::new("I'll be back")),
            classifier: Arc::new(LengthClassifier::new()),
            gateway: Arc::new(StubBillingGateway::new(behaviour)),
            conversations: Arc::new(InMemoryConversationRepository::new()),
        }
    }

    pub fn spam_service(&self) -> SpamService {
        SpamService::new(self.embedder.clone(), self.classifier.clone())
    }

    pub fn code_review_service(&self) -> CodeReviewService {
        CodeReviewService::new(self.llm.clone())
    }

    pub fn search_service(&self) -> SubtitleSearchService {
        SubtitleSearchService::new(
            self.embedder.clone(),
            self.llm.clone(),
            self.vector_store.clone(),
            self.transcription.clone(),
            3000,
        )
    }

    pub fn ingestion_service(&self) -> SubtitleIngestionService {
        SubtitleIngestionService::new(
            Arc::new(SrtLoader),
            self.embedder.clone(),
            self.vector_store.clone(),
            Arc::new(RecursiveCharacterSplitter::new(200, 40)),
        )
    }

    pub fn support_service(&self) -> SupportChatService {
        let graph = SupportGraph::new(self.llm.clone(), self.gateway.clone());
        SupportChatService::new(Arc::new(graph), self.conversations.clone(), 50)
    }

    pub fn state(&self) -> AppState {
        AppState {
            spam_service: Arc::new(self.spam_service()),
            code_review_service: Arc::new(self.code_review_service()),
            subtitle_search_service: Arc::new(self.search_service()),
            subtitle_ingestion_service: Arc::new(self.ingestion_service()),
            support_chat_service: Arc::new(self.support_service()),
            recording: RecordingSettings {
                sample_rate: 16_000,
                channels: 1,
                max_duration_secs: 5,
            },
        }
    }
}

pub const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:03,500
<i>I'll be back.</i>

2
00:00:04,000 --> 00:00:06,000
- Hasta la vista, baby.

3
00:01:10,250 --> 00:01:12,000
{\\an8}Come with me if you want to live.
";

/// Serves `app` on an ephemeral local port until the sender fires.
pub async fn spawn_server(app: Router) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}
