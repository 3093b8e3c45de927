//! List Messages Use Case

use crate::application::authenticate::require_caller;
use crate::domain::entities::ChatMessage;
use crate::domain::repository::ChatRepository;
use crate::domain::value_objects::{ChatId, MessagePage};
use crate::error::{ChatError, ChatResult};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ListMessagesInput {
    pub access_token: Option<String>,
    pub chat_id: Option<ChatId>,
    pub page: MessagePage,
}

pub struct ListMessagesUseCase<R>
where
    R: ChatRepository,
{
    repo: Arc<R>,
}

impl<R> ListMessagesUseCase<R>
where
    R: ChatRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: ListMessagesInput) -> ChatResult<Vec<ChatMessage>> {
        let caller = require_caller(&*self.repo, input.access_token).await?;
        let chat_id = input.chat_id.ok_or(ChatError::MissingChatId)?;

        let messages = self
            .repo
            .list_messages(&caller.access_token, &chat_id, input.page)
            .await?;

        tracing::debug!(
            user_id = %caller.user.id,
            chat_id = %chat_id.as_str(),
            count = messages.len(),
            "Listed chat messages"
        );

        Ok(messages)
    }
}
