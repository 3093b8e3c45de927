//! Repository Traits

use crate::domain::entities::{ChatMessage, NewMessage};
use crate::domain::value_objects::{ChatId, MessagePage};
use crate::error::ChatResult;
use platform::hosted::UserStore;

/// Message persistence, always under the caller's identity so row-level
/// policies decide which conversations are visible.
#[trait_variant::make(MessageRepository: Send)]
pub trait LocalMessageRepository {
    /// Newest first
    async fn list_messages(
        &self,
        access_token: &str,
        chat_id: &ChatId,
        page: MessagePage,
    ) -> ChatResult<Vec<ChatMessage>>;

    async fn insert_message(
        &self,
        access_token: &str,
        message: &NewMessage,
    ) -> ChatResult<ChatMessage>;
}

/// Everything the chat routes need, bundled for handler bounds.
pub trait ChatRepository: MessageRepository + UserStore + Clone + Send + Sync + 'static {}

impl<T> ChatRepository for T where T: MessageRepository + UserStore + Clone + Send + Sync + 'static {}
