use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram rejected {method}: {description}")]
    Api { method: String, description: String },
}

// Inbound update types. Only the fields this bot consumes are modelled;
// everything else in the update payload is ignored by serde.

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardButton {
    pub fn new(text: &str, callback_data: &str) -> Self {
        InlineKeyboardButton {
            text: text.to_string(),
            callback_data: callback_data.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// Thin client for the Telegram Bot API over HTTPS.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(TelegramClient {
            http,
            base_url: format!("{}/bot{}", TELEGRAM_API_BASE, token),
        })
    }

    async fn call(&self, method: &str, payload: Value) -> Result<Value, TelegramError> {
        let response = self
            .http
            .post(format!("{}/{}", self.base_url, method))
            .json(&payload)
            .send()
            .await?;

        let body: Value = response.json().await?;
        if body["ok"].as_bool().unwrap_or(false) {
            Ok(body)
        } else {
            let description = body["description"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string();
            Err(TelegramError::Api {
                method: method.to_string(),
                description,
            })
        }
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        self.call("sendMessage", json!({ "chat_id": chat_id, "text": text }))
            .await?;
        Ok(())
    }

    pub async fn send_message_with_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &InlineKeyboardMarkup,
    ) -> Result<(), TelegramError> {
        self.call(
            "sendMessage",
            json!({ "chat_id": chat_id, "text": text, "reply_markup": keyboard }),
        )
        .await?;
        Ok(())
    }

    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<(), TelegramError> {
        let mut payload = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text
        });
        if let Some(mode) = parse_mode {
            payload["parse_mode"] = json!(mode);
        }
        self.call("editMessageText", payload).await?;
        Ok(())
    }

    /// Stops the client-side loading spinner on an inline button press.
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TelegramError> {
        self.call(
            "answerCallbackQuery",
            json!({ "callback_query_id": callback_query_id }),
        )
        .await?;
        Ok(())
    }

    pub async fn set_webhook(&self, url: &str) -> Result<(), TelegramError> {
        info!("Setting webhook to: {}", url);
        self.call("setWebhook", json!({ "url": url })).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_parses_text_message() {
        let raw = json!({
            "update_id": 10,
            "message": {
                "message_id": 1,
                "from": { "id": 42, "first_name": "Sara", "last_name": "K" },
                "chat": { "id": 42 },
                "text": "hello"
            }
        });
        let update: Update = serde_json::from_value(raw).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.text.as_deref(), Some("hello"));
        assert_eq!(message.from.unwrap().full_name(), "Sara K");
    }

    #[test]
    fn test_update_parses_callback_query() {
        let raw = json!({
            "update_id": 11,
            "callback_query": {
                "id": "abc",
                "from": { "id": 42, "first_name": "Sara" },
                "data": "report",
                "message": {
                    "message_id": 5,
                    "chat": { "id": 42 }
                }
            }
        });
        let update: Update = serde_json::from_value(raw).unwrap();
        let query = update.callback_query.unwrap();
        assert_eq!(query.data.as_deref(), Some("report"));
        assert_eq!(query.message.unwrap().message_id, 5);
    }

    #[test]
    fn test_update_without_message_or_callback() {
        let raw = json!({ "update_id": 12 });
        let update: Update = serde_json::from_value(raw).unwrap();
        assert!(update.message.is_none());
        assert!(update.callback_query.is_none());
    }
}
