use std::sync::Arc;

use crate::application::ports::{
    ChatMessage, Embedder, EmbedderError, LlmClient, LlmClientError, TranscriptionEngine,
    TranscriptionError, VectorStore, VectorStoreError,
};
use crate::domain::SearchProfile;

use super::input::{InputError, SEARCH_EMPTY_WARNING, require_text};
use super::token_counter::take_within_budget;

pub const NO_MATCH_ANSWER: &str = "No matching subtitles found.";
const CONTEXT_SEPARATOR: &str = "\n\n";

/// Identifies a movie or show from a line of its dialogue.
pub struct SubtitleSearchService {
    embedder: Arc<dyn Embedder>,
    llm_client: Arc<dyn LlmClient>,
    vector_store: Arc<dyn VectorStore>,
    transcription_engine: Arc<dyn TranscriptionEngine>,
    max_context_tokens: usize,
}

#[derive(Debug, Clone)]
pub struct SearchAnswer {
    pub answer: String,
    pub sources: Vec<MatchedSubtitle>,
}

#[derive(Debug, Clone)]
pub struct MatchedSubtitle {
    pub text: String,
    pub source: Option<String>,
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct AudioSearchAnswer {
    pub transcript: String,
    pub search: SearchAnswer,
}

impl SubtitleSearchService {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        llm_client: Arc<dyn LlmClient>,
        vector_store: Arc<dyn VectorStore>,
        transcription_engine: Arc<dyn TranscriptionEngine>,
        max_context_tokens: usize,
    ) -> Self {
        Self {
            embedder,
            llm_client,
            vector_store,
            transcription_engine,
            max_context_tokens,
        }
    }

    #[tracing::instrument(skip(self, query), fields(profile = %profile))]
    pub async fn search(
        &self,
        query: &str,
        profile: SearchProfile,
    ) -> Result<SearchAnswer, SearchError> {
        let query = require_text(query, SEARCH_EMPTY_WARNING)?;

        let query_embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(SearchError::Embedding)?;

        let results = self
            .vector_store
            .search(&query_embedding, profile.top_k())
            .await?;

        if results.is_empty() {
            tracing::info!("No subtitle chunks matched the query");
            return Ok(SearchAnswer {
                answer: NO_MATCH_ANSWER.to_string(),
                sources: Vec::new(),
            });
        }

        let passages = take_within_budget(
            results.iter().map(|r| r.chunk.text.as_str()),
            CONTEXT_SEPARATOR,
            self.max_context_tokens,
        );
        if passages.len() < results.len() {
            tracing::debug!(
                kept = passages.len(),
                retrieved = results.len(),
                "Context trimmed to token budget"
            );
        }
        let context = passages.join(CONTEXT_SEPARATOR);
        let kept = passages.len();

        let prompt = profile.render(&context, query);
        let answer = self
            .llm_client
            .complete(&[ChatMessage::user(prompt)])
            .await
            .map_err(SearchError::Completion)?;

        let sources = results
            .into_iter()
            .take(kept)
            .map(|r| MatchedSubtitle {
                text: r.chunk.text,
                source: r.chunk.source,
                score: r.score,
            })
            .collect();

        tracing::info!(answer_chars = answer.len(), "Subtitle search completed");

        Ok(SearchAnswer {
            answer: answer.trim().to_string(),
            sources,
        })
    }

    /// Transcribes recorded speech and searches with the transcript.
    #[tracing::instrument(skip(self, audio_data), fields(bytes = audio_data.len(), profile = %profile))]
    pub async fn search_audio(
        &self,
        audio_data: &[u8],
        profile: SearchProfile,
    ) -> Result<AudioSearchAnswer, SearchError> {
        let transcript = self.transcription_engine.transcribe(audio_data).await?;
        tracing::info!(chars = transcript.len(), "Speech recognised");

        let search = self.search(&transcript, profile).await?;

        Ok(AudioSearchAnswer { transcript, search })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("transcription: {0}")]
    Transcription(#[from] TranscriptionError),
    #[error("embedding: {0}")]
    Embedding(EmbedderError),
    #[error("search: {0}")]
    Search(#[from] VectorStoreError),
    #[error("completion: {0}")]
    Completion(LlmClientError),
}
