//! API DTOs (Data Transfer Objects)

use crate::domain::entities::ChatMessage;
use crate::domain::value_objects::ChatId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query for GET /api/messages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesQuery {
    pub chat_id: Option<String>,
    #[serde(rename = "chatId")]
    pub chat_id_camel: Option<String>,
    pub from: Option<String>,
    pub limit: Option<String>,
}

impl MessagesQuery {
    pub fn chat_id(&self) -> Option<ChatId> {
        [&self.chat_id, &self.chat_id_camel]
            .into_iter()
            .flatten()
            .find_map(|raw| ChatId::parse(raw))
    }
}

/// Response for GET /api/messages
#[derive(Debug, Clone, Serialize)]
pub struct MessagesResponse {
    pub ok: bool,
    pub items: Vec<ChatMessage>,
}

/// Body of POST /api/messages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub chat_id: Value,
    #[serde(rename = "chatId", default)]
    pub chat_id_camel: Value,
    pub text: Option<String>,
    pub message: Option<String>,
}

impl SendMessageRequest {
    pub fn chat_id(&self) -> Option<ChatId> {
        ChatId::from_json(&self.chat_id).or_else(|| ChatId::from_json(&self.chat_id_camel))
    }

    /// `text`, or `message` when `text` is empty
    pub fn text(&self) -> Option<String> {
        [&self.text, &self.message]
            .into_iter()
            .flatten()
            .find(|t| !t.is_empty())
            .cloned()
    }
}

/// Response for POST /api/messages
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageResponse {
    pub ok: bool,
    pub message: ChatMessage,
}

/// Body of POST /api/chat
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Value,
    #[serde(default)]
    pub context: Value,
}

/// Response for POST /api/chat
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub ok: bool,
    pub reply: String,
    pub has_context: bool,
    pub user_id: String,
}
