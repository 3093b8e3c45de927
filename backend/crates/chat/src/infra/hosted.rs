//! Hosted Database Repository Implementations
//!
//! Messages are read and written with the caller's own token, never the
//! service role, so conversation membership is enforced by row-level policies.

use crate::domain::entities::{ChatMessage, NewMessage};
use crate::domain::repository::MessageRepository;
use crate::domain::value_objects::{ChatId, MessagePage};
use crate::error::ChatResult;
use platform::hosted::{AuthUser, HostedClient, HostedError, UserStore};

/// Hosted-database-backed message repository
#[derive(Clone)]
pub struct HostedChatRepository {
    client: HostedClient,
}

impl HostedChatRepository {
    pub fn new(client: HostedClient) -> Self {
        Self { client }
    }
}

impl MessageRepository for HostedChatRepository {
    async fn list_messages(
        &self,
        access_token: &str,
        chat_id: &ChatId,
        page: MessagePage,
    ) -> ChatResult<Vec<ChatMessage>> {
        Ok(self
            .client
            .as_user(access_token)
            .from("messages")
            .select("*")
            .eq("chat_id", chat_id.as_str())
            .order("created_at", false)
            .range(page.from, page.to())
            .fetch()
            .await?)
    }

    async fn insert_message(
        &self,
        access_token: &str,
        message: &NewMessage,
    ) -> ChatResult<ChatMessage> {
        Ok(self
            .client
            .as_user(access_token)
            .from("messages")
            .select("*")
            .insert(message)
            .await?)
    }
}

impl UserStore for HostedChatRepository {
    async fn user_for_token(&self, access_token: &str) -> Result<Option<AuthUser>, HostedError> {
        UserStore::user_for_token(&self.client, access_token).await
    }
}
