use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{ChatMessage, LlmClient, LlmClientError};
use crate::presentation::config::{LlmProvider, LlmSettings};

/// Chat-completions client for OpenAI and OpenAI-compatible endpoints.
pub struct OpenAiClient {
    client: Client,
    provider: LlmProvider,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            provider: LlmProvider::OpenAi,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: 1024,
            temperature: 0.0,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.provider {
            LlmProvider::Azure => request.header("api-key", &self.api_key),
            _ => request.bearer_auth(&self.api_key),
        }
    }

    fn completions_url(&self) -> String {
        match self.provider {
            LlmProvider::Azure => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.base_url,
                self.model,
                crate::presentation::config::AZURE_API_VERSION
            ),
            _ => format!("{}/chat/completions", self.base_url),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmClientError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "Sending chat completion");

        let request = self
            .client
            .post(self.completions_url())
            .json(&request_body);
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let completion_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        let content = completion_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmClientError::InvalidResponse("empty choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        tracing::info!(model = %self.model, chars = content.len(), "Chat completion received");
        Ok(content)
    }
}

/// Builds a client for `model` against the provider configured in `settings`.
pub fn create_llm_client(settings: &LlmSettings, model: &str) -> Result<OpenAiClient, LlmClientError> {
    let base_url = match settings.provider {
        LlmProvider::OpenAi => settings
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
        LlmProvider::LmStudio => settings.base_url.clone().ok_or_else(|| {
            LlmClientError::Configuration("base_url required for lmstudio provider".to_string())
        })?,
        LlmProvider::Azure => settings.azure_endpoint.clone().ok_or_else(|| {
            LlmClientError::Configuration(
                "azure_endpoint required for azure provider".to_string(),
            )
        })?,
    };

    let api_key = settings
        .resolve_api_key()
        .map_err(|e| LlmClientError::Configuration(e.to_string()))?;

    let client = Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .build()
        .map_err(|e| LlmClientError::Configuration(e.to_string()))?;

    Ok(OpenAiClient {
        client,
        provider: settings.provider,
        base_url: base_url.trim_end_matches('/').to_string(),
        api_key,
        model: model.to_string(),
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
    })
}
