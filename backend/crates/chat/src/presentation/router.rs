//! Chat Router

use crate::application::config::ChatConfig;
use crate::domain::repository::ChatRepository;
use crate::infra::hosted::HostedChatRepository;
use crate::presentation::handlers::{self, ChatAppState};
use axum::{Router, routing::get, routing::post};
use platform::rate_limit::SlidingWindowStore;
use std::sync::Arc;

/// Create the chat router backed by the hosted database
pub fn chat_router(
    repo: HostedChatRepository,
    limiter: Arc<SlidingWindowStore>,
    config: ChatConfig,
) -> Router {
    chat_router_generic(repo, limiter, config)
}

/// Create a chat router for any repository implementation
pub fn chat_router_generic<R>(
    repo: R,
    limiter: Arc<SlidingWindowStore>,
    config: ChatConfig,
) -> Router
where
    R: ChatRepository,
{
    let state = ChatAppState {
        repo: Arc::new(repo),
        limiter,
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/messages",
            get(handlers::list_messages::<R>).post(handlers::send_message::<R>),
        )
        .route("/chat", post(handlers::chat::<R>))
        .with_state(state)
}
