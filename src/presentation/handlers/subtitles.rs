use std::time::Duration;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::{Multipart, Query, State};
use serde::{Deserialize, Serialize};

use crate::application::services::{AudioSearchAnswer, SearchAnswer};
use crate::domain::SearchProfile;
use crate::infrastructure::audio::{PcmFormat, PcmRecorder, RecordingError};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::error::ApiError;

#[derive(Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub profile: SearchProfile,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub answer: String,
    pub profile: String,
    pub sources: Vec<SourceSubtitle>,
}

#[derive(Serialize)]
pub struct SourceSubtitle {
    pub text: String,
    pub source: Option<String>,
    pub score: f32,
}

#[derive(Serialize)]
pub struct AudioSearchResponse {
    pub transcript: String,
    pub answer: String,
    pub profile: String,
    pub sources: Vec<SourceSubtitle>,
}

#[derive(Serialize)]
pub struct IngestResponse {
    pub document_id: String,
    pub title: String,
    pub chunks: usize,
}

#[derive(Deserialize)]
pub struct RecordParams {
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
    #[serde(default)]
    pub profile: SearchProfile,
}

impl SearchResponse {
    fn new(answer: SearchAnswer, profile: SearchProfile) -> Self {
        Self {
            answer: answer.answer,
            profile: profile.to_string(),
            sources: answer
                .sources
                .into_iter()
                .map(|s| SourceSubtitle {
                    text: s.text,
                    source: s.source,
                    score: s.score,
                })
                .collect(),
        }
    }
}

impl AudioSearchResponse {
    fn new(answer: AudioSearchAnswer, profile: SearchProfile) -> Self {
        let search = SearchResponse::new(answer.search, profile);
        Self {
            transcript: answer.transcript,
            answer: search.answer,
            profile: search.profile,
            sources: search.sources,
        }
    }
}

struct Upload {
    file_name: Option<String>,
    data: Option<Bytes>,
    profile: Option<String>,
    title: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut upload = Upload {
        file_name: None,
        data: None,
        profile: None,
        title: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                upload.file_name = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;
                upload.data = Some(data);
            }
            Some(name @ ("profile" | "title")) => {
                let name = name.to_string();
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read {}: {}", name, e)))?;
                if name == "profile" {
                    upload.profile = Some(value);
                } else {
                    upload.title = Some(value);
                }
            }
            other => tracing::debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    Ok(upload)
}

fn parse_profile(raw: Option<&str>) -> Result<SearchProfile, ApiError> {
    match raw.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => p.parse().map_err(ApiError::BadRequest),
        None => Ok(SearchProfile::default()),
    }
}

#[tracing::instrument(skip(state, request), fields(profile = %request.profile))]
pub async fn search_subtitles_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    tracing::debug!(query = %sanitize_prompt(&request.query), "Searching subtitles");

    let answer = state
        .subtitle_search_service
        .search(&request.query, request.profile)
        .await?;

    Ok(Json(SearchResponse::new(answer, request.profile)))
}

#[tracing::instrument(skip(state, multipart))]
pub async fn search_audio_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AudioSearchResponse>, ApiError> {
    let upload = read_upload(multipart).await?;
    let profile = parse_profile(upload.profile.as_deref())?;
    let data = upload
        .data
        .ok_or_else(|| ApiError::BadRequest("No audio file uploaded".to_string()))?;

    tracing::debug!(
        filename = ?upload.file_name,
        bytes = data.len(),
        profile = %profile,
        "Processing audio upload"
    );

    let answer = state
        .subtitle_search_service
        .search_audio(&data, profile)
        .await?;

    tracing::debug!(transcript = %sanitize_prompt(&answer.transcript), "Audio query answered");
    Ok(Json(AudioSearchResponse::new(answer, profile)))
}

/// Captures raw s16le PCM from the request body, then searches with its transcript.
#[tracing::instrument(skip(state, params, body))]
pub async fn record_handler(
    State(state): State<AppState>,
    Query(params): Query<RecordParams>,
    body: Body,
) -> Result<Json<AudioSearchResponse>, ApiError> {
    let format = PcmFormat::new(
        params.sample_rate.unwrap_or(state.recording.sample_rate),
        params.channels.unwrap_or(state.recording.channels),
    );
    if !(8_000..=192_000).contains(&format.sample_rate) {
        return Err(ApiError::BadRequest(format!(
            "Unsupported sample rate: {}",
            format.sample_rate
        )));
    }
    if !(1..=2).contains(&format.channels) {
        return Err(ApiError::BadRequest(format!(
            "Unsupported channel count: {}",
            format.channels
        )));
    }

    let recorder = PcmRecorder::new(
        format,
        Duration::from_secs(state.recording.max_duration_secs),
    );
    let recording = recorder
        .record(body.into_data_stream())
        .await
        .map_err(|e: RecordingError| ApiError::BadRequest(e.to_string()))?;

    let wav = recording.to_wav();
    let answer = state
        .subtitle_search_service
        .search_audio(&wav, params.profile)
        .await?;

    Ok(Json(AudioSearchResponse::new(answer, params.profile)))
}

#[tracing::instrument(skip(state, multipart))]
pub async fn ingest_subtitles_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<IngestResponse>, ApiError> {
    let upload = read_upload(multipart).await?;
    let data = upload
        .data
        .ok_or_else(|| ApiError::BadRequest("No subtitle file uploaded".to_string()))?;

    let title = upload
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| {
            upload
                .file_name
                .as_deref()
                .map(|name| name.trim_end_matches(".srt").to_string())
        })
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("A title is required".to_string()))?;

    tracing::debug!(title = %title, bytes = data.len(), "Ingesting subtitle file");

    let report = state
        .subtitle_ingestion_service
        .ingest(&data, Some(&title))
        .await?;

    Ok(Json(IngestResponse {
        document_id: report.document_id.as_uuid().to_string(),
        title,
        chunks: report.chunks,
    }))
}
