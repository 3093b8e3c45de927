//! Chat Echo Use Case
//!
//! Answers with an echo of the user's message; no model is called.

use crate::application::authenticate::require_caller;
use crate::application::config::ChatConfig;
use crate::domain::repository::ChatRepository;
use crate::domain::value_objects::{echo_reply, is_truthy};
use crate::error::{ChatError, ChatResult};
use platform::client::ClientContext;
use platform::rate_limit::RateLimitStore;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ChatEchoInput {
    pub access_token: Option<String>,
    /// Must be a non-blank string
    pub message: Value,
    pub context: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEchoOutput {
    pub reply: String,
    pub has_context: bool,
    pub user_id: String,
}

pub struct ChatEchoUseCase<R, L>
where
    R: ChatRepository,
    L: RateLimitStore,
{
    repo: Arc<R>,
    limiter: Arc<L>,
    config: Arc<ChatConfig>,
}

impl<R, L> ChatEchoUseCase<R, L>
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
        input: ChatEchoInput,
        client: &ClientContext,
    ) -> ChatResult<ChatEchoOutput> {
        self.limiter
            .check_and_increment(&client.rate_key("chat"), &self.config.chat_limit)
            .await
            .ensure_allowed()?;

        let caller = require_caller(&*self.repo, input.access_token).await?;

        let message = match &input.message {
            Value::String(s) if !s.trim().is_empty() => s.as_str(),
            _ => return Err(ChatError::InvalidMessage),
        };

        Ok(ChatEchoOutput {
            reply: echo_reply(message, self.config.echo_max_chars),
            has_context: is_truthy(&input.context),
            user_id: caller.user.id,
        })
    }
}
