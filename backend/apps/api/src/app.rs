//! Router Assembly
//!
//! Every domain router is mounted twice: under `/api` and under the legacy
//! `/.netlify/functions` prefix the deployed frontend still calls.

use crate::settings::{CorsOrigins, Settings};
use crate::spa_env::{self, SpaEnv};
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Json, Router};
use catalog::{CatalogConfig, HostedCatalogRepository, catalog_router};
use chat::{ChatConfig, HostedChatRepository, chat_router};
use enrollment::{EnrollmentConfig, HostedEnrollmentRepository, TwilioVerify, enrollment_router};
use platform::hosted::{HostedClient, HostedConfig};
use platform::rate_limit::SlidingWindowStore;
use platform::web::MAX_BODY_BYTES;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub const API_PREFIX: &str = "/api";
pub const LEGACY_PREFIX: &str = "/.netlify/functions";

const CORS_MAX_AGE: Duration = Duration::from_secs(600);

/// Build the full application router from loaded settings.
pub fn build_app(settings: &Settings, http: reqwest::Client) -> Router {
    let hosted = HostedClient::new(
        HostedConfig {
            url: settings.supabase.url.clone().unwrap_or_default(),
            anon_key: settings.supabase.anon_key.clone().unwrap_or_default(),
            service_role_key: settings.supabase.service_role_key.clone(),
        },
        http.clone(),
    );
    let verifier = TwilioVerify::new(settings.twilio.clone(), http);
    let enrollment_config = match &settings.otp_session_secret {
        Some(secret) => EnrollmentConfig::with_secret(secret.as_bytes()),
        None => EnrollmentConfig::with_random_secret(),
    };

    // One limiter so a client's budget is the same under either prefix
    let limiter = Arc::new(SlidingWindowStore::new());

    let spa = Arc::new(SpaEnv {
        supabase_url: settings.supabase.url.clone(),
        supabase_anon_key: settings.supabase.anon_key.clone(),
    });

    let functions = Router::new()
        .merge(catalog_router(
            HostedCatalogRepository::new(hosted.clone()),
            CatalogConfig::default(),
        ))
        .merge(enrollment_router(
            HostedEnrollmentRepository::new(hosted.clone()),
            verifier,
            limiter.clone(),
            enrollment_config,
        ))
        .merge(chat_router(
            HostedChatRepository::new(hosted),
            limiter,
            ChatConfig::default(),
        ))
        .route("/spa_env", get(spa_env::spa_env).with_state(spa));

    let mut app = Router::new()
        .route("/health", get(health))
        .nest(API_PREFIX, functions.clone())
        .nest(LEGACY_PREFIX, functions);

    if let Some(dir) = &settings.static_dir {
        tracing::info!(dir = %dir.display(), "Serving static files");
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&settings.cors_origins))
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::any(),
        CorsOrigins::List(list) => AllowOrigin::list(
            list.iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        ),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ]))
        .max_age(CORS_MAX_AGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SupabaseSettings;
    use axum::body::Body;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{HeaderMap, Request, StatusCode};
    use std::net::SocketAddr;
    use tower::ServiceExt;
    use wiremock::matchers::{header as header_is, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(url: Option<&str>, anon_key: Option<&str>) -> Settings {
        Settings {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            supabase: SupabaseSettings {
                url: url.map(str::to_string),
                anon_key: anon_key.map(str::to_string),
                service_role_key: None,
            },
            twilio: None,
            otp_session_secret: Some("test-secret".to_string()),
            cors_origins: CorsOrigins::Any,
            static_dir: None,
        }
    }

    fn app(settings: &Settings) -> Router {
        build_app(settings, reqwest::Client::new())
            .layer(MockConnectInfo(SocketAddr::from(([192, 168, 1, 7], 6000))))
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

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, body) = send(app(&settings(None, None)), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_spa_env_under_both_prefixes() {
        let settings = settings(Some("https://abc.supabase.co"), Some("anon-key"));

        for uri in ["/api/spa_env", "/.netlify/functions/spa_env"] {
            let (status, headers, body) = send(app(&settings), get_req(uri)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(headers[header::CACHE_CONTROL], "no-store");
            assert_eq!(
                body,
                json!({
                    "ok": true,
                    "SUPABASE_URL": "https://abc.supabase.co",
                    "SUPABASE_ANON_KEY": "anon-key"
                })
            );
        }
    }

    #[tokio::test]
    async fn test_spa_env_missing_values() {
        let settings = settings(Some("https://abc.supabase.co"), None);
        let (status, headers, body) = send(app(&settings), get_req("/api/spa_env")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Missing Supabase envs");
        assert_eq!(body["SUPABASE_URL"], "https://abc.supabase.co");
        assert_eq!(body["SUPABASE_ANON_KEY"], "");
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/otp_start")
            .header(header::ORIGIN, "https://example.ro")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        let (status, headers, _) = send(app(&settings(None, None)), request).await;

        assert!(status.is_success());
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "600");
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        assert!(methods.contains("POST"));
    }

    #[tokio::test]
    async fn test_cors_allow_list() {
        let mut settings = settings(None, None);
        settings.cors_origins = CorsOrigins::List(vec!["https://meseriasi.ro".to_string()]);

        let allowed = Request::get("/health")
            .header(header::ORIGIN, "https://meseriasi.ro")
            .body(Body::empty())
            .unwrap();
        let (_, headers, _) = send(app(&settings), allowed).await;
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://meseriasi.ro");

        let other = Request::get("/health")
            .header(header::ORIGIN, "https://evil.example")
            .body(Body::empty())
            .unwrap();
        let (_, headers, _) = send(app(&settings), other).await;
        assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_otp_without_provider_is_500() {
        let (status, _, body) = send(
            app(&settings(None, None)),
            post_json("/api/otp_start", json!({ "phone": "0722123456" }).to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Verification provider not configured");
    }

    #[tokio::test]
    async fn test_rate_limit_shared_across_prefixes() {
        let router = app(&settings(None, None));
        let body = json!({ "phone": "0722123456" }).to_string();

        for _ in 0..5 {
            let (status, _, _) = send(router.clone(), post_json("/api/otp_start", body.clone())).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        }
        let (status, headers, _) = send(
            router,
            post_json("/.netlify/functions/otp_start", body),
        )
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert!(headers.contains_key(header::RETRY_AFTER));
    }

    #[tokio::test]
    async fn test_oversized_body_is_413() {
        let body = format!(r#"{{"phone":"{}"}}"#, "1".repeat(MAX_BODY_BYTES));
        let (status, _, body) = send(
            app(&settings(None, None)),
            post_json("/api/otp_start", body),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn test_catalog_reads_hosted_database() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/service_subcategories"))
            .and(query_param("service_id", "eq.3"))
            .and(header_is("apikey", "anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 11, "name": "Curățenie generală" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let settings = settings(Some(&server.uri()), Some("anon-key"));
        let (status, headers, body) = send(
            app(&settings),
            get_req("/.netlify/functions/subcategories?serviceId=3"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CACHE_CONTROL],
            "public, max-age=120, s-maxage=120"
        );
        assert_eq!(body["items"], json!([{ "id": 11, "name": "Curățenie generală" }]));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _, _) = send(app(&settings(None, None)), get_req("/api/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
