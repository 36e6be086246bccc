//! OpenAI Chat Completions client with image input.
//!
//! Sends one system message and one user message whose content is the
//! prompt's text segments followed by the image as an inline data URI.

use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::ServiceConfig;
use crate::default_client;
use crate::prompt::{PromptPayload, UserContent};

use super::{ApiError, ApiResult, ImageAttachment, RawCompletion, VisionModel};

/// Chat Completions path relative to the API base URL.
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Configuration for the OpenAI client.
#[derive(Clone)]
pub struct OpenAiConfig {
    /// Bearer credential. `None` means the client is not usable.
    pub api_key: Option<String>,
    /// Base URL without the `/v1/...` suffix.
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4.1-mini".to_string(),
            max_tokens: 300,
        }
    }
}

impl From<&ServiceConfig> for OpenAiConfig {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            base_url: config.api_base_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

// Keeps the key out of Debug output.
impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: OpenAiError,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Vision client for the OpenAI Chat Completions API.
pub struct OpenAiVisionClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiVisionClient {
    /// Creates a client with the shared default HTTP client settings.
    pub fn new(config: OpenAiConfig, timeout: std::time::Duration) -> Self {
        let client = default_client::create_client(default_client::ORIGINATOR, timeout);
        Self { client, config }
    }

    /// Creates a client with a custom HTTP client.
    ///
    /// Useful for testing or custom configurations.
    pub fn with_client(client: reqwest::Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{CHAT_COMPLETIONS_PATH}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Builds the request body for the Chat Completions API.
    fn build_request_body(&self, payload: &PromptPayload, image: &ImageAttachment) -> Value {
        let content: Vec<Value> = payload
            .user_content
            .iter()
            .map(|segment| match segment {
                UserContent::Text { text } => json!({ "type": "text", "text": text }),
                UserContent::Image => json!({
                    "type": "image_url",
                    "image_url": { "url": image.data_uri() }
                }),
            })
            .collect();

        json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": payload.system_instruction },
                { "role": "user", "content": content },
            ],
            "max_tokens": self.config.max_tokens,
        })
    }

    /// Extracts the first choice's text from a successful response body.
    fn parse_completion(body: &str) -> ApiResult<RawCompletion> {
        let parsed: ChatCompletionResponse = serde_json::from_str(body)
            .map_err(|e| ApiError::Parse(format!("Failed to parse completion: {e}")))?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(ApiError::EmptyCompletion);
        };
        let text = choice
            .message
            .and_then(|m| m.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(ApiError::EmptyCompletion);
        }

        Ok(RawCompletion {
            text,
            model: parsed.model,
            finish_reason: choice.finish_reason,
        })
    }
}

#[async_trait]
impl VisionModel for OpenAiVisionClient {
    fn is_configured(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    async fn complete(
        &self,
        payload: &PromptPayload,
        image: &ImageAttachment,
    ) -> ApiResult<RawCompletion> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ApiError::NotAuthenticated)?;

        let body = self.build_request_body(payload, image);
        let started = Instant::now();
        tracing::debug!(
            model = %self.config.model,
            mime_type = image.mime_type(),
            image_bytes = image.len(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::info!(
            model = %self.config.model,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "chat completion finished"
        );

        if !status.is_success() {
            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&text) {
                return Err(ApiError::ApiResponse {
                    status: status.as_u16(),
                    message: error_response.error.message,
                    error_type: error_response.error.error_type,
                });
            }

            return Err(ApiError::ApiResponse {
                status: status.as_u16(),
                message: text,
                error_type: None,
            });
        }

        Self::parse_completion(&text)
    }
}
