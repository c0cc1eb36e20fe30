use async_trait::async_trait;
use reqwest::multipart;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "whisper-1";

/// Hosted Whisper speech-to-text over `/audio/transcriptions`.
pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_bytes: usize,
}

impl OpenAiWhisperEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_bytes: 25 * 1024 * 1024,
        }
    }

    pub fn with_max_file_size_mb(mut self, megabytes: usize) -> Self {
        self.max_bytes = megabytes * 1024 * 1024;
        self
    }
}

/// Picks the upload file name and MIME type from the container's magic bytes.
pub fn detect_audio_format(data: &[u8]) -> Result<(&'static str, &'static str), TranscriptionError> {
    match data {
        [] => Err(TranscriptionError::UnsupportedFormat("empty audio".to_string())),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => {
            Ok(("audio.wav", "audio/wav"))
        }
        [b'I', b'D', b'3', ..] | [0xFF, 0xFB | 0xF3 | 0xF2, ..] => Ok(("audio.mp3", "audio/mpeg")),
        [b'O', b'g', b'g', b'S', ..] => Ok(("audio.ogg", "audio/ogg")),
        [b'f', b'L', b'a', b'C', ..] => Ok(("audio.flac", "audio/flac")),
        [_, _, _, _, b'f', b't', b'y', b'p', ..] => Ok(("audio.m4a", "audio/mp4")),
        [0x1A, 0x45, 0xDF, 0xA3, ..] => Ok(("audio.webm", "audio/webm")),
        _ => Err(TranscriptionError::UnsupportedFormat(
            "unrecognised audio container".to_string(),
        )),
    }
}

#[async_trait]
impl TranscriptionEngine for OpenAiWhisperEngine {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError> {
        let (file_name, mime) = detect_audio_format(audio_data)?;
        if audio_data.len() > self.max_bytes {
            return Err(TranscriptionError::UnsupportedFormat(format!(
                "audio is {} bytes, limit is {}",
                audio_data.len(),
                self.max_bytes
            )));
        }

        let url = format!("{}/audio/transcriptions", self.base_url);

        let file_part = multipart::Part::bytes(audio_data.to_vec())
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file_part);

        tracing::debug!(model = %self.model, mime, bytes = audio_data.len(), "Sending audio to Whisper API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let transcript = response
            .text()
            .await
            .map_err(|e| TranscriptionError::TranscriptionFailed(format!("body: {}", e)))?;

        tracing::info!(chars = transcript.len(), "Whisper transcription completed");

        Ok(transcript.trim().to_string())
    }
}
