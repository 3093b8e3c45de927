//! Send Message Use Case

use crate::application::authenticate::require_caller;
use crate::application::config::ChatConfig;
use crate::domain::entities::{ChatMessage, NewMessage};
use crate::domain::repository::ChatRepository;
use crate::domain::value_objects::ChatId;
use crate::error::{ChatError, ChatResult};
use kernel::validation::sanitize_message;
use platform::client::ClientContext;
use platform::rate_limit::RateLimitStore;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct SendMessageInput {
    pub access_token: Option<String>,
    pub chat_id: Option<ChatId>,
    pub text: Option<String>,
}

pub struct SendMessageUseCase<R, L>
where
    R: ChatRepository,
    L: RateLimitStore,
{
    repo: Arc<R>,
    limiter: Arc<L>,
    config: Arc<ChatConfig>,
}

impl<R, L> SendMessageUseCase<R, L>
where
    R: ChatRepository,
    L: RateLimitStore,
{
    pub fn new(repo: Arc<R>, limiter: Arc<L>, config: Arc<ChatConfig>) -> Self {
        Self {
            repo,
            limiter,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: SendMessageInput,
        client: &ClientContext,
    ) -> ChatResult<ChatMessage> {
        let caller = require_caller(&*self.repo, input.access_token).await?;

        self.limiter
            .check_and_increment(&client.rate_key("messages"), &self.config.messages_limit)
            .await
            .ensure_allowed()?;

        let text = sanitize_message(input.text.as_deref().unwrap_or_default());
        let chat_id = match input.chat_id {
            Some(id) if !text.trim().is_empty() => id,
            Some(_) => return Err(ChatError::InvalidMessage),
            None => return Err(ChatError::MissingChatId),
        };

        let message = NewMessage {
            chat_id: chat_id.as_str().to_string(),
            sender_id: caller.user.id.clone(),
            text,
        };
        let stored = self
            .repo
            .insert_message(&caller.access_token, &message)
            .await?;

        tracing::info!(
            user_id = %caller.user.id,
            chat_id = %chat_id.as_str(),
            "Chat message sent"
        );

        Ok(stored)
    }
}
