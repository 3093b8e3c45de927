//! Twilio Verify client
//!
//! `POST /v2/Services/{sid}/Verifications` sends a code and
//! `POST /v2/Services/{sid}/VerificationCheck` checks one. Both take form
//! bodies and HTTP basic auth with the account SID and auth token.

use crate::domain::repository::VerificationProvider;
use crate::domain::value_objects::{Channel, VerificationStatus};
use crate::error::VerificationError;
use kernel::validation::{OtpCode, PhoneNumber};
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://verify.twilio.com";

/// Status reported when a check finds no pending verification.
pub const EXPIRED_STATUS: &str = "expired";

#[derive(Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Verify service SID (`VA...`)
    pub service_sid: String,
    pub base_url: String,
}

impl fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("service_sid", &self.service_sid)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TwilioConfig {
    /// `None` unless all three credentials are non-empty.
    pub fn new(account_sid: &str, auth_token: &str, service_sid: &str) -> Option<Self> {
        let [account_sid, auth_token, service_sid] =
            [account_sid, auth_token, service_sid].map(str::trim);
        if account_sid.is_empty() || auth_token.is_empty() || service_sid.is_empty() {
            return None;
        }
        Some(Self {
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
            service_sid: service_sid.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, resource: &str) -> String {
        format!(
            "{}/v2/Services/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.service_sid,
            resource
        )
    }
}

#[derive(Deserialize)]
struct VerificationBody {
    status: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Verification provider backed by Twilio Verify.
///
/// Unconfigured instances answer every call with
/// [`VerificationError::NotConfigured`].
#[derive(Debug, Clone)]
pub struct TwilioVerify {
    http: reqwest::Client,
    config: Option<Arc<TwilioConfig>>,
}

impl TwilioVerify {
    pub fn new(config: Option<TwilioConfig>, http: reqwest::Client) -> Self {
        Self {
            http,
            config: config.map(Arc::new),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    async fn post(
        &self,
        resource: &str,
        form: &[(&str, &str)],
    ) -> Result<reqwest::Response, VerificationError> {
        let config = self.config.as_ref().ok_or(VerificationError::NotConfigured)?;
        Ok(self
            .http
            .post(config.endpoint(resource))
            .basic_auth(&config.account_sid, Some(&config.auth_token))
            .form(form)
            .send()
            .await?)
    }
}

impl VerificationProvider for TwilioVerify {
    async fn start(
        &self,
        phone: &PhoneNumber,
        channel: Channel,
    ) -> Result<VerificationStatus, VerificationError> {
        let response = self
            .post(
                "Verifications",
                &[("To", phone.as_str()), ("Channel", channel.as_str())],
            )
            .await?;
        read_status(response).await
    }

    async fn check(
        &self,
        phone: &PhoneNumber,
        code: &OtpCode,
    ) -> Result<VerificationStatus, VerificationError> {
        let response = self
            .post(
                "VerificationCheck",
                &[("To", phone.as_str()), ("Code", code.as_str())],
            )
            .await?;

        // No pending verification: the code expired or was already used.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(VerificationStatus(EXPIRED_STATUS.to_string()));
        }
        read_status(response).await
    }
}

async fn read_status(response: reqwest::Response) -> Result<VerificationStatus, VerificationError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("Verification provider returned {status}"));
        return Err(VerificationError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice::<VerificationBody>(&bytes)
        .map(|body| VerificationStatus(body.status))
        .map_err(|e| VerificationError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn verify(server: &MockServer) -> TwilioVerify {
        let config = TwilioConfig::new("AC123", "secret", "VA456")
            .unwrap()
            .with_base_url(server.uri());
        TwilioVerify::new(Some(config), reqwest::Client::new())
    }

    fn phone() -> PhoneNumber {
        PhoneNumber::parse("+40722123456").unwrap()
    }

    #[test]
    fn test_config_requires_all_credentials() {
        assert!(TwilioConfig::new("AC123", "secret", "VA456").is_some());
        assert!(TwilioConfig::new("AC123", "", "VA456").is_none());
        assert!(TwilioConfig::new(" ", "secret", "VA456").is_none());

        let debug = format!("{:?}", TwilioConfig::new("AC123", "secret", "VA456").unwrap());
        assert!(!debug.contains("secret"));
    }

    #[tokio::test]
    async fn test_start_posts_form_with_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/Services/VA456/Verifications"))
            // base64("AC123:secret")
            .and(header("authorization", "Basic QUMxMjM6c2VjcmV0"))
            .and(body_string_contains("To=%2B40722123456"))
            .and(body_string_contains("Channel=call"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "sid": "VE1", "status": "pending"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let status = verify(&server).start(&phone(), Channel::Call).await.unwrap();
        assert_eq!(status.as_str(), "pending");
    }

    #[tokio::test]
    async fn test_check_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/Services/VA456/VerificationCheck"))
            .and(body_string_contains("Code=123456"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "approved", "valid": true
            })))
            .mount(&server)
            .await;

        let code = OtpCode::parse("123456").unwrap();
        let status = verify(&server).check(&phone(), &code).await.unwrap();
        assert!(status.is_approved());
    }

    #[tokio::test]
    async fn test_check_without_pending_verification_is_expired() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/Services/VA456/VerificationCheck"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": 20404, "message": "The requested resource was not found", "status": 404
            })))
            .mount(&server)
            .await;

        let code = OtpCode::parse("1234").unwrap();
        let status = verify(&server).check(&phone(), &code).await.unwrap();
        assert_eq!(status.as_str(), EXPIRED_STATUS);
        assert!(!status.is_approved());
    }

    #[tokio::test]
    async fn test_api_error_keeps_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/Services/VA456/Verifications"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "code": 60203, "message": "Max send attempts reached", "status": 429
            })))
            .mount(&server)
            .await;

        let err = verify(&server).start(&phone(), Channel::Sms).await.unwrap_err();
        match err {
            VerificationError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Max send attempts reached");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_never_calls_out() {
        let verify = TwilioVerify::new(None, reqwest::Client::new());
        assert!(!verify.is_configured());
        let err = verify.start(&phone(), Channel::Sms).await.unwrap_err();
        assert!(matches!(err, VerificationError::NotConfigured));
    }
}
