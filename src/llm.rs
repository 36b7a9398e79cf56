use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::prompt::Prompt;

/// Sampling settings for one model call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

pub const SUMMARY_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.3,
    max_tokens: 500,
};

pub const CHAT_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.7,
    max_tokens: 1000,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: Prompt,
    pub params: GenerationParams,
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response format from LLM: {0}")]
    InvalidResponse(String),
}

/// A remote text-generation backend.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

/// Client for Groq's OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GroqClient {
    pub fn new(
        api_base: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: request.model,
            messages: vec![
                Message {
                    role: "system".into(),
                    content: request.prompt.system,
                },
                Message {
                    role: "user".into(),
                    content: request.prompt.user,
                },
            ],
            temperature: request.params.temperature,
            max_tokens: request.params.max_tokens,
        };

        debug!(
            model = %body.model,
            temperature = body.temperature,
            max_tokens = body.max_tokens,
            "sending completion request"
        );

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "completion request rejected");
            return Err(LlmError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let json: serde_json::Value = res.json().await?;
        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                LlmError::InvalidResponse("missing or empty choices[0].message.content".to_string())
            })?
            .to_string();

        debug!(reply_len = reply.len(), "received completion");
        Ok(reply)
    }
}

/// Prefers the `error.message` of an OpenAI-style error envelope over the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
