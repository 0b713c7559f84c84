use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config;
use crate::models::chat_message::ChatMessage;

const API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const TEMPERATURE: f32 = 0.8;
const MAX_TOKENS: u32 = 150;

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed completion response: {0}")]
    Malformed(String),
}

/// Stateless request/response seam to the language model. One attempt per
/// message, bounded timeout, no retries.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        history: Vec<ChatMessage>,
        user_text: String,
    ) -> Result<String, CompletionError>;
}

/// OpenRouter chat-completions client.
#[derive(Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(OpenRouterClient { http, api_key })
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterClient {
    async fn complete(
        &self,
        history: Vec<ChatMessage>,
        user_text: String,
    ) -> Result<String, CompletionError> {
        let mut messages = vec![ChatMessage::system(config::SYSTEM_PROMPT.to_string())];
        messages.extend(history);
        messages.push(ChatMessage::user(user_text));

        let payload = json!({
            "model": config::COMPLETION_MODEL,
            "messages": messages,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS
        });

        let response = self
            .http
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CompletionError::Status(response.status()));
        }

        let body: Value = response.json().await?;
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(|content| content.to_string())
            .ok_or_else(|| CompletionError::Malformed(body.to_string()))
    }
}
