//! API DTOs (Data Transfer Objects)
//!
//! Request bodies are read with `LenientJson`, so every field is optional
//! and a broken body reaches validation as all-`None`.

use crate::domain::entities::CreatedProvider;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of POST /api/otp_start
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtpStartRequest {
    pub phone: Option<String>,
    /// Older clients send the number as `to`
    pub to: Option<String>,
    pub channel: Option<String>,
}

impl OtpStartRequest {
    pub fn phone(&self) -> Option<String> {
        first_filled(&self.phone, &self.to)
    }
}

/// Response for POST /api/otp_start
#[derive(Debug, Clone, Serialize)]
pub struct OtpStartResponse {
    pub ok: bool,
    pub status: String,
}

/// Body of POST /api/otp_verify
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtpVerifyRequest {
    pub phone: Option<String>,
    pub to: Option<String>,
    pub code: Option<String>,
}

impl OtpVerifyRequest {
    pub fn phone(&self) -> Option<String> {
        first_filled(&self.phone, &self.to)
    }
}

/// Response for an approved code
#[derive(Debug, Clone, Serialize)]
pub struct OtpVerifyResponse {
    pub ok: bool,
    pub status: String,
    pub otp_session: String,
    pub expires_in: u64,
}

/// 400 body for a wrong or expired code
#[derive(Debug, Clone, Serialize)]
pub struct OtpRejectedResponse {
    pub ok: bool,
    pub error: String,
    pub status: String,
}

/// Body of POST /api/create-offer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOfferRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "serviceId", default)]
    pub service_id: Value,
    #[serde(alias = "description")]
    pub descriere: Option<String>,
    #[serde(rename = "otpToken")]
    pub otp_token: Option<String>,
    #[serde(default)]
    pub meta: Value,
}

/// Response for POST /api/create-offer
#[derive(Debug, Clone, Serialize)]
pub struct CreateOfferResponse {
    pub ok: bool,
    pub id: i64,
    pub created_at: String,
}

/// Body of POST /api/register_provider
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterProviderRequest {
    pub company_name: Option<String>,
    pub service_name: Option<String>,
    pub judet: Option<String>,
    pub oras: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Parent subcategory id
    #[serde(default)]
    pub subcat: Value,
    /// First child subcategory id
    #[serde(default)]
    pub subsub: Value,
    /// Child ids as an array or `"1,2,3"`
    #[serde(default)]
    pub subsubs: Value,
}

/// Response for POST /api/register_provider
#[derive(Debug, Clone, Serialize)]
pub struct RegisterProviderResponse {
    pub ok: bool,
    pub provider: CreatedProvider,
}

fn first_filled(a: &Option<String>, b: &Option<String>) -> Option<String> {
    [a, b]
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
        .cloned()
}
