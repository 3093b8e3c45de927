//! Domain Entities

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `messages` row as returned to participants.
///
/// Columns other than the ones named here pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Value,
    pub chat_id: Value,
    pub sender_id: String,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMessage {
    pub chat_id: String,
    pub sender_id: String,
    pub text: String,
}
