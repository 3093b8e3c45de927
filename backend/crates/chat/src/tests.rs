//! Router tests for the chat crate against an in-memory repository

use crate::application::config::ChatConfig;
use crate::domain::entities::{ChatMessage, NewMessage};
use crate::domain::repository::MessageRepository;
use crate::domain::value_objects::{ChatId, MessagePage};
use crate::error::ChatResult;
use crate::presentation::router::chat_router_generic;
use axum::Router;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{HeaderMap, Request, StatusCode, header};
use platform::hosted::{AuthUser, HostedError, UserStore};
use platform::rate_limit::SlidingWindowStore;
use serde_json::{Map, Value, json};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Clone, Default)]
struct FakeChat {
    /// Stored messages, oldest first
    rows: Arc<Mutex<Vec<ChatMessage>>>,
    /// Every page requested, in order
    pages: Arc<Mutex<Vec<(String, MessagePage)>>>,
}

impl FakeChat {
    fn seeded(chat_id: i64, count: usize) -> Self {
        let fake = Self::default();
        {
            let mut rows = fake.rows.lock().unwrap();
            for i in 0..count {
                rows.push(message(i as i64 + 1, chat_id, &format!("m{}", i + 1)));
            }
        }
        fake
    }
}

fn message(id: i64, chat_id: i64, text: &str) -> ChatMessage {
    ChatMessage {
        id: json!(id),
        chat_id: json!(chat_id),
        sender_id: "user-1".to_string(),
        text: text.to_string(),
        created_at: Some(format!("2025-05-01T10:{:02}:00Z", id)),
        extra: Map::new(),
    }
}

impl MessageRepository for FakeChat {
    async fn list_messages(
        &self,
        _access_token: &str,
        chat_id: &ChatId,
        page: MessagePage,
    ) -> ChatResult<Vec<ChatMessage>> {
        self.pages
            .lock()
            .unwrap()
            .push((chat_id.as_str().to_string(), page));
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|m| m.chat_id.to_string() == chat_id.as_str())
            .skip(page.from)
            .take(page.limit)
            .cloned()
            .collect())
    }

    async fn insert_message(
        &self,
        _access_token: &str,
        new: &NewMessage,
    ) -> ChatResult<ChatMessage> {
        let mut rows = self.rows.lock().unwrap();
        let stored = ChatMessage {
            id: json!(rows.len() + 1),
            chat_id: json!(new.chat_id),
            sender_id: new.sender_id.clone(),
            text: new.text.clone(),
            created_at: None,
            extra: Map::new(),
        };
        rows.push(stored.clone());
        Ok(stored)
    }
}

impl UserStore for FakeChat {
    async fn user_for_token(&self, access_token: &str) -> Result<Option<AuthUser>, HostedError> {
        Ok((access_token == "good-token").then(|| AuthUser {
            id: "user-1".to_string(),
            email: None,
            phone: None,
        }))
    }
}

fn app(repo: FakeChat) -> Router {
    chat_router_generic(repo, Arc::new(SlidingWindowStore::new()), ChatConfig::default())
        .layer(MockConnectInfo(SocketAddr::from(([10, 0, 0, 2], 5000))))
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut request = Request::get(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    request.body(Body::empty()).unwrap()
}

fn post(uri: &str, headers: &[(&str, &str)], body: Value) -> Request<Body> {
    let mut request = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    request.body(Body::from(body.to_string())).unwrap()
}

const AUTH: (&str, &str) = ("authorization", "Bearer good-token");

// ============================================================================
// GET messages
// ============================================================================

#[tokio::test]
async fn test_list_messages_newest_first_with_paging() {
    let repo = FakeChat::seeded(12, 5);
    let (status, headers, body) = send(
        app(repo.clone()),
        get("/messages?chatId=12&from=1&limit=2", Some("good-token")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    assert_eq!(body["ok"], true);
    let texts: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["m4", "m3"]);
}

#[tokio::test]
async fn test_list_messages_clamps_paging() {
    let repo = FakeChat::seeded(12, 1);
    let (status, _, _) = send(
        app(repo.clone()),
        get("/messages?chat_id=12&from=-4&limit=1000", Some("good-token")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        repo.pages.lock().unwrap()[0],
        ("12".to_string(), MessagePage { from: 0, limit: 100 })
    );
}

#[tokio::test]
async fn test_list_messages_auth_then_chat_id() {
    let router = app(FakeChat::default());

    let (status, headers, body) = send(router.clone(), get("/messages?chat_id=1", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers[header::WWW_AUTHENTICATE], "Bearer");
    assert_eq!(body["error"], "Authentication required");

    let (status, _, body) = send(router.clone(), get("/messages?chat_id=1", Some("stale"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");

    let (status, _, body) = send(router, get("/messages", Some("good-token"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "chat_id is required");
}

// ============================================================================
// POST messages
// ============================================================================

#[tokio::test]
async fn test_send_message_strips_markup() {
    let repo = FakeChat::default();
    let (status, _, body) = send(
        app(repo.clone()),
        post(
            "/messages",
            &[AUTH],
            json!({ "chatId": 12, "message": "<b>Bună</b> ziua" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ok"], true);
    assert_eq!(body["message"]["text"], "bBună/b ziua");
    assert_eq!(body["message"]["sender_id"], "user-1");
    assert_eq!(repo.rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_send_message_validation() {
    let router = app(FakeChat::default());

    let (status, _, body) = send(
        router.clone(),
        post("/messages", &[AUTH], json!({ "chat_id": "12", "text": "<>  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid message");

    let (status, _, body) = send(router.clone(), post("/messages", &[AUTH], json!({ "text": "hi" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "chat_id is required");

    let (status, _, _) = send(router, post("/messages", &[], json!({ "chat_id": 1, "text": "hi" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_send_message_rate_limit() {
    let router = app(FakeChat::default());
    let body = json!({ "chat_id": 12, "text": "hi" });

    for _ in 0..8 {
        let (status, _, _) = send(router.clone(), post("/messages", &[AUTH], body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, headers, json) = send(router, post("/messages", &[AUTH], body)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(headers.contains_key(header::RETRY_AFTER));
    assert!(json["retry_after"].as_u64().unwrap() >= 1);
}

// ============================================================================
// POST chat
// ============================================================================

#[tokio::test]
async fn test_chat_echo() {
    let (status, headers, body) = send(
        app(FakeChat::default()),
        post(
            "/chat",
            &[AUTH],
            json!({ "message": "Salut", "context": { "page": "home" } }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    assert_eq!(
        body,
        json!({ "ok": true, "reply": "Echo: Salut", "has_context": true, "user_id": "user-1" })
    );
}

#[tokio::test]
async fn test_chat_reads_cookie_token_and_truncates() {
    let long = "x".repeat(800);
    let (status, _, body) = send(
        app(FakeChat::default()),
        post(
            "/chat",
            &[("cookie", "theme=dark; sb-access-token=good-token")],
            json!({ "message": long }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"].as_str().unwrap().len(), "Echo: ".len() + 500);
    assert_eq!(body["has_context"], false);
}

#[tokio::test]
async fn test_chat_rejects_bad_input() {
    let router = app(FakeChat::default());

    let (status, _, _) = send(router.clone(), post("/chat", &[], json!({ "message": "hi" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, body) = send(router.clone(), post("/chat", &[AUTH], json!({ "message": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid message");

    let (status, _, _) = send(router, post("/chat", &[AUTH], json!({ "message": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_rate_limit_counts_before_auth() {
    let router = app(FakeChat::default());

    for _ in 0..6 {
        let (status, _, _) = send(router.clone(), post("/chat", &[], json!({ "message": "hi" }))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, _, body) = send(router, post("/chat", &[AUTH], json!({ "message": "hi" }))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Too Many Requests");
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let (status, _, _) = send(
        app(FakeChat::default()),
        Request::get("/chat").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
