mod common;

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Multipart, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Json;
use serde_json::{Value, json};

use common::spawn_server;
use demohub::application::ports::{
    ChatMessage, Embedder, EmbedderError, LlmClient, LlmClientError, TranscriptionEngine,
    TranscriptionError,
};
use demohub::infrastructure::audio::{OpenAiWhisperEngine, detect_audio_format};
use demohub::infrastructure::llm::{OpenAiClient, OpenAiEmbedder, create_llm_client};
use demohub::presentation::config::{LlmProvider, LlmSettings};

#[derive(Default, Clone)]
struct Captured {
    authorization: Arc<Mutex<Option<String>>>,
    body: Arc<Mutex<Option<Value>>>,
}

fn chat_server(captured: Captured, path: &'static str) -> Router {
    Router::new().route(
        path,
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let captured = captured.clone();
            async move {
                let auth = headers
                    .get("authorization")
                    .or_else(|| headers.get("api-key"))
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                *captured.authorization.lock().unwrap() = auth;
                *captured.body.lock().unwrap() = Some(body);
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": "The Terminator, 1984"}}]
                }))
            }
        }),
    )
}

fn status_server(path: &'static str, status: StatusCode) -> Router {
    Router::new().route(path, post(move || async move { (status, "upstream says no") }))
}

fn llm_settings(provider: LlmProvider) -> LlmSettings {
    LlmSettings {
        provider,
        base_url: None,
        azure_endpoint: None,
        api_key: Some("sk-test".to_string()),
        api_key_file: None,
        max_tokens: 256,
        temperature: 0.2,
        request_timeout_secs: 5,
    }
}

#[tokio::test]
async fn given_openai_endpoint_when_completing_then_sends_messages_with_bearer_key() {
    let captured = Captured::default();
    let (base_url, shutdown) = spawn_server(chat_server(captured.clone(), "/chat/completions")).await;
    let client = OpenAiClient::new(base_url, "sk-test", "gpt-4o-mini");

    let answer = client
        .complete(&[ChatMessage::system("be brief"), ChatMessage::user("who said it?")])
        .await
        .unwrap();

    assert_eq!(answer, "The Terminator, 1984");
    assert_eq!(
        captured.authorization.lock().unwrap().as_deref(),
        Some("Bearer sk-test")
    );
    let body = captured.body.lock().unwrap().clone().unwrap();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "who said it?");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn given_lmstudio_settings_when_creating_client_then_uses_configured_base_url() {
    let captured = Captured::default();
    let (base_url, shutdown) = spawn_server(chat_server(captured.clone(), "/v1/chat/completions")).await;
    let mut settings = llm_settings(LlmProvider::LmStudio);
    settings.base_url = Some(format!("{}/v1/", base_url));
    settings.api_key = None;

    let client = create_llm_client(&settings, "local-model").unwrap();
    let answer = client.complete(&[ChatMessage::user("hi")]).await.unwrap();

    assert_eq!(answer, "The Terminator, 1984");
    let body = captured.body.lock().unwrap().clone().unwrap();
    assert_eq!(body["max_tokens"], 256);
    assert_eq!(body["model"], "local-model");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn given_azure_settings_when_completing_then_calls_deployment_with_api_key_header() {
    let captured = Captured::default();
    let app = Router::new().route(
        "/openai/deployments/{deployment}/chat/completions",
        post({
            let captured = captured.clone();
            move |Query(query): Query<std::collections::HashMap<String, String>>,
                  headers: HeaderMap,
                  Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    assert_eq!(query.get("api-version").map(String::as_str), Some("2024-06-01"));
                    *captured.authorization.lock().unwrap() = headers
                        .get("api-key")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    *captured.body.lock().unwrap() = Some(body);
                    Json(json!({"choices": [{"message": {"content": "ok"}}]}))
                }
            }
        }),
    );
    let (base_url, shutdown) = spawn_server(app).await;
    let mut settings = llm_settings(LlmProvider::Azure);
    settings.azure_endpoint = Some(base_url);

    let client = create_llm_client(&settings, "gpt-4o-mini").unwrap();
    let answer = client.complete(&[ChatMessage::user("hi")]).await.unwrap();

    assert_eq!(answer, "ok");
    assert_eq!(captured.authorization.lock().unwrap().as_deref(), Some("sk-test"));

    let _ = shutdown.send(());
}

#[test]
fn given_providers_without_endpoints_when_creating_client_then_rejects_configuration() {
    let lmstudio = create_llm_client(&llm_settings(LlmProvider::LmStudio), "m");
    let azure = create_llm_client(&llm_settings(LlmProvider::Azure), "m");

    assert!(matches!(lmstudio, Err(LlmClientError::Configuration(_))));
    assert!(matches!(azure, Err(LlmClientError::Configuration(_))));
}

#[test]
fn given_openai_without_key_when_creating_client_then_rejects_configuration() {
    let mut settings = llm_settings(LlmProvider::OpenAi);
    settings.api_key = None;

    let result = create_llm_client(&settings, "gpt-4o-mini");

    assert!(matches!(result, Err(LlmClientError::Configuration(_))));
}

#[tokio::test]
async fn given_rate_limited_endpoint_when_completing_then_returns_rate_limited() {
    let (base_url, shutdown) =
        spawn_server(status_server("/chat/completions", StatusCode::TOO_MANY_REQUESTS)).await;
    let client = OpenAiClient::new(base_url, "sk-test", "gpt-4o-mini");

    let result = client.complete(&[ChatMessage::user("hi")]).await;

    assert!(matches!(result, Err(LlmClientError::RateLimited)));
    let _ = shutdown.send(());
}

#[tokio::test]
async fn given_failing_endpoint_when_completing_then_reports_status_and_body() {
    let (base_url, shutdown) =
        spawn_server(status_server("/chat/completions", StatusCode::INTERNAL_SERVER_ERROR)).await;
    let client = OpenAiClient::new(base_url, "sk-test", "gpt-4o-mini");

    let result = client.complete(&[ChatMessage::user("hi")]).await;

    match result {
        Err(LlmClientError::ApiRequestFailed(message)) => {
            assert!(message.contains("500"));
            assert!(message.contains("upstream says no"));
        }
        other => panic!("expected ApiRequestFailed, got {:?}", other),
    }
    let _ = shutdown.send(());
}

#[tokio::test]
async fn given_empty_choices_when_completing_then_returns_invalid_response() {
    let app = Router::new().route(
        "/chat/completions",
        post(|| async { Json(json!({"choices": []})) }),
    );
    let (base_url, shutdown) = spawn_server(app).await;
    let client = OpenAiClient::new(base_url, "sk-test", "gpt-4o-mini");

    let result = client.complete(&[ChatMessage::user("hi")]).await;

    assert!(matches!(result, Err(LlmClientError::InvalidResponse(_))));
    let _ = shutdown.send(());
}

#[tokio::test]
async fn given_embeddings_endpoint_when_embedding_batch_then_returns_vectors_in_order() {
    let app = Router::new().route(
        "/embeddings",
        post(|Json(body): Json<Value>| async move {
            let data: Vec<Value> = body["input"]
                .as_array()
                .unwrap()
                .iter()
                .enumerate()
                .map(|(i, _)| json!({"embedding": [i as f32, 1.0, 0.5]}))
                .collect();
            Json(json!({"data": data}))
        }),
    );
    let (base_url, shutdown) = spawn_server(app).await;
    let embedder = OpenAiEmbedder::new(base_url, "sk-test".to_string(), "text-embedding-3-small".to_string())
        .with_dimension(3);

    let embeddings = embedder.embed_batch(&["one", "two"]).await.unwrap();

    assert_eq!(embeddings.len(), 2);
    assert_eq!(embeddings[1].values, vec![1.0, 1.0, 0.5]);
    assert_eq!(embedder.dimensions(), Some(3));
    let _ = shutdown.send(());
}

#[tokio::test]
async fn given_short_embeddings_response_when_embedding_then_returns_invalid_response() {
    let app = Router::new().route(
        "/embeddings",
        post(|| async { Json(json!({"data": [{"embedding": [0.1]}]})) }),
    );
    let (base_url, shutdown) = spawn_server(app).await;
    let embedder = OpenAiEmbedder::new(base_url, "sk-test".to_string(), "m".to_string());

    let result = embedder.embed_batch(&["one", "two"]).await;

    assert!(matches!(result, Err(EmbedderError::InvalidResponse(_))));
    let _ = shutdown.send(());
}

#[test]
fn given_container_magic_bytes_when_detecting_format_then_picks_mime_type() {
    let wav = b"RIFF\x24\x00\x00\x00WAVEfmt ";
    let mp3 = b"ID3\x04\x00";
    let ogg = b"OggS\x00\x02";
    let flac = b"fLaC\x00";
    let m4a = b"\x00\x00\x00\x20ftypM4A ";
    let webm = [0x1A, 0x45, 0xDF, 0xA3, 0x01];

    assert_eq!(detect_audio_format(wav).unwrap(), ("audio.wav", "audio/wav"));
    assert_eq!(detect_audio_format(mp3).unwrap().1, "audio/mpeg");
    assert_eq!(detect_audio_format(&[0xFF, 0xFB, 0x90]).unwrap().1, "audio/mpeg");
    assert_eq!(detect_audio_format(ogg).unwrap().1, "audio/ogg");
    assert_eq!(detect_audio_format(flac).unwrap().1, "audio/flac");
    assert_eq!(detect_audio_format(m4a).unwrap().1, "audio/mp4");
    assert_eq!(detect_audio_format(&webm).unwrap().1, "audio/webm");
}

#[test]
fn given_unknown_or_empty_audio_when_detecting_format_then_rejects_it() {
    assert!(matches!(
        detect_audio_format(b""),
        Err(TranscriptionError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        detect_audio_format(b"%PDF-1.7"),
        Err(TranscriptionError::UnsupportedFormat(_))
    ));
}

#[tokio::test]
async fn given_whisper_endpoint_when_transcribing_then_uploads_form_and_trims_text() {
    let fields: Arc<Mutex<Vec<(String, String)>>> = Arc::default();
    let app = Router::new().route(
        "/audio/transcriptions",
        post({
            let fields = fields.clone();
            move |mut multipart: Multipart| {
                let fields = fields.clone();
                async move {
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().unwrap_or_default().to_string();
                        let value = match field.file_name() {
                            Some(file_name) => file_name.to_string(),
                            None => field.text().await.unwrap(),
                        };
                        fields.lock().unwrap().push((name, value));
                    }
                    "  I'll be back.\n"
                }
            }
        }),
    );
    let (base_url, shutdown) = spawn_server(app).await;
    let engine = OpenAiWhisperEngine::new("sk-test".to_string(), Some(base_url), None);

    let transcript = engine.transcribe(b"RIFF\0\0\0\0WAVEfmt ").await.unwrap();

    assert_eq!(transcript, "I'll be back.");
    let fields = fields.lock().unwrap().clone();
    assert!(fields.contains(&("model".to_string(), "whisper-1".to_string())));
    assert!(fields.contains(&("response_format".to_string(), "text".to_string())));
    assert!(fields.contains(&("file".to_string(), "audio.wav".to_string())));
    let _ = shutdown.send(());
}

#[tokio::test]
async fn given_oversized_audio_when_transcribing_then_rejects_before_upload() {
    let engine = OpenAiWhisperEngine::new("sk-test".to_string(), Some("http://127.0.0.1:9".to_string()), None)
        .with_max_file_size_mb(0);

    let result = engine.transcribe(b"RIFF\0\0\0\0WAVEfmt ").await;

    assert!(matches!(result, Err(TranscriptionError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn given_whisper_error_when_transcribing_then_returns_api_failure() {
    let (base_url, shutdown) =
        spawn_server(status_server("/audio/transcriptions", StatusCode::UNAUTHORIZED)).await;
    let engine = OpenAiWhisperEngine::new("bad-key".to_string(), Some(base_url), Some("whisper-1".to_string()));

    let result = engine.transcribe(b"OggS\0\0").await;

    assert!(matches!(result, Err(TranscriptionError::ApiRequestFailed(msg)) if msg.contains("401")));
    let _ = shutdown.send(());
}
