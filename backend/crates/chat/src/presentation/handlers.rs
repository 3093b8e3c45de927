//! HTTP Handlers

use crate::application::chat_echo::{ChatEchoInput, ChatEchoUseCase};
use crate::application::config::ChatConfig;
use crate::application::list_messages::{ListMessagesInput, ListMessagesUseCase};
use crate::application::send_message::{SendMessageInput, SendMessageUseCase};
use crate::domain::repository::ChatRepository;
use crate::domain::value_objects::MessagePage;
use crate::error::ChatResult;
use crate::presentation::dto::{
    ChatRequest, ChatResponse, MessagesQuery, MessagesResponse, SendMessageRequest,
    SendMessageResponse,
};
use axum::Json;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use platform::client::ClientContext;
use platform::cookie::{extract_access_token, extract_bearer};
use platform::rate_limit::SlidingWindowStore;
use platform::web::{LenientJson, no_store};
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared state for chat handlers
#[derive(Clone)]
pub struct ChatAppState<R>
where
    R: ChatRepository,
{
    pub repo: Arc<R>,
    pub limiter: Arc<SlidingWindowStore>,
    pub config: Arc<ChatConfig>,
}

/// GET /api/messages?chat_id=&from=&limit=
pub async fn list_messages<R>(
    State(state): State<ChatAppState<R>>,
    headers: HeaderMap,
    Query(query): Query<MessagesQuery>,
) -> ChatResult<impl IntoResponse>
where
    R: ChatRepository,
{
    let input = ListMessagesInput {
        access_token: extract_bearer(&headers),
        chat_id: query.chat_id(),
        page: MessagePage::from_params(query.from.as_deref(), query.limit.as_deref()),
    };
    let items = ListMessagesUseCase::new(state.repo.clone())
        .execute(input)
        .await?;

    Ok((no_store(), Json(MessagesResponse { ok: true, items })))
}

/// POST /api/messages
pub async fn send_message<R>(
    State(state): State<ChatAppState<R>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    LenientJson(req): LenientJson<SendMessageRequest>,
) -> ChatResult<impl IntoResponse>
where
    R: ChatRepository,
{
    let client = ClientContext::from_headers(&headers, Some(addr.ip()));
    let use_case = SendMessageUseCase::new(
        state.repo.clone(),
        state.limiter.clone(),
        state.config.clone(),
    );

    let input = SendMessageInput {
        access_token: extract_bearer(&headers),
        chat_id: req.chat_id(),
        text: req.text(),
    };
    let message = use_case.execute(input, &client).await?;

    Ok((
        StatusCode::CREATED,
        no_store(),
        Json(SendMessageResponse { ok: true, message }),
    ))
}

/// POST /api/chat
pub async fn chat<R>(
    State(state): State<ChatAppState<R>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    LenientJson(req): LenientJson<ChatRequest>,
) -> ChatResult<impl IntoResponse>
where
    R: ChatRepository,
{
    let client = ClientContext::from_headers(&headers, Some(addr.ip()));
    let use_case = ChatEchoUseCase::new(
        state.repo.clone(),
        state.limiter.clone(),
        state.config.clone(),
    );

    let input = ChatEchoInput {
        access_token: extract_access_token(&headers),
        message: req.message,
        context: req.context,
    };
    let output = use_case.execute(input, &client).await?;

    Ok((
        no_store(),
        Json(ChatResponse {
            ok: true,
            reply: output.reply,
            has_context: output.has_context,
            user_id: output.user_id,
        }),
    ))
}
