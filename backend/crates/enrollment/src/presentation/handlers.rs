//! HTTP Handlers

use crate::application::config::EnrollmentConfig;
use crate::application::create_offer::{CreateOfferInput, CreateOfferUseCase};
use crate::application::otp_start::{OtpStartInput, OtpStartUseCase};
use crate::application::otp_verify::{OtpVerifyInput, OtpVerifyOutput, OtpVerifyUseCase};
use crate::application::register_provider::{RegisterProviderInput, RegisterProviderUseCase};
use crate::domain::repository::{EnrollmentRepository, VerificationProvider};
use crate::error::EnrollmentResult;
use crate::presentation::dto::{
    CreateOfferRequest, CreateOfferResponse, OtpRejectedResponse, OtpStartRequest,
    OtpStartResponse, OtpVerifyRequest, OtpVerifyResponse, RegisterProviderRequest,
    RegisterProviderResponse,
};
use axum::Json;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use platform::client::ClientContext;
use platform::cookie::{extract_access_token, extract_bearer};
use platform::rate_limit::SlidingWindowStore;
use platform::web::{LenientJson, no_store};
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared state for enrollment handlers
#[derive(Clone)]
pub struct EnrollmentAppState<R, V>
where
    R: EnrollmentRepository,
    V: VerificationProvider + Clone + Sync + 'static,
{
    pub repo: Arc<R>,
    pub verifier: Arc<V>,
    pub limiter: Arc<SlidingWindowStore>,
    pub config: Arc<EnrollmentConfig>,
}

// ============================================================================
// Phone verification
// ============================================================================

/// POST /api/otp_start
pub async fn otp_start<R, V>(
    State(state): State<EnrollmentAppState<R, V>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    LenientJson(req): LenientJson<OtpStartRequest>,
) -> EnrollmentResult<impl IntoResponse>
where
    R: EnrollmentRepository,
    V: VerificationProvider + Clone + Sync + 'static,
{
    let client = ClientContext::from_headers(&headers, Some(addr.ip()));
    let use_case = OtpStartUseCase::new(
        state.verifier.clone(),
        state.limiter.clone(),
        state.config.clone(),
    );

    let input = OtpStartInput {
        phone: req.phone(),
        channel: req.channel,
    };
    let status = use_case.execute(input, &client).await?;

    Ok((
        no_store(),
        Json(OtpStartResponse {
            ok: true,
            status: status.0,
        }),
    ))
}

/// POST /api/otp_verify
pub async fn otp_verify<R, V>(
    State(state): State<EnrollmentAppState<R, V>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    LenientJson(req): LenientJson<OtpVerifyRequest>,
) -> EnrollmentResult<Response>
where
    R: EnrollmentRepository,
    V: VerificationProvider + Clone + Sync + 'static,
{
    let client = ClientContext::from_headers(&headers, Some(addr.ip()));
    let use_case = OtpVerifyUseCase::new(
        state.verifier.clone(),
        state.limiter.clone(),
        state.config.clone(),
    );

    let input = OtpVerifyInput {
        phone: req.phone(),
        code: req.code,
    };

    let response = match use_case.execute(input, &client).await? {
        OtpVerifyOutput::Approved {
            status,
            otp_session,
            expires_in,
        } => (
            StatusCode::OK,
            no_store(),
            Json(OtpVerifyResponse {
                ok: true,
                status: status.0,
                otp_session,
                expires_in,
            }),
        )
            .into_response(),
        OtpVerifyOutput::Rejected { status } => (
            StatusCode::BAD_REQUEST,
            no_store(),
            Json(OtpRejectedResponse {
                ok: false,
                error: "Incorrect or expired code".to_string(),
                status: status.0,
            }),
        )
            .into_response(),
    };
    Ok(response)
}

// ============================================================================
// Offers
// ============================================================================

/// POST /api/create-offer (also /api/offers)
pub async fn create_offer<R, V>(
    State(state): State<EnrollmentAppState<R, V>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    LenientJson(req): LenientJson<CreateOfferRequest>,
) -> EnrollmentResult<impl IntoResponse>
where
    R: EnrollmentRepository,
    V: VerificationProvider + Clone + Sync + 'static,
{
    let client = ClientContext::from_headers(&headers, Some(addr.ip()));
    let use_case = CreateOfferUseCase::new(
        state.repo.clone(),
        state.limiter.clone(),
        state.config.clone(),
    );

    let input = CreateOfferInput {
        email: req.email,
        phone: req.phone,
        service_id: req.service_id,
        description: req.descriere,
        otp_token: req.otp_token,
        meta: req.meta,
        access_token: extract_access_token(&headers),
    };
    let created = use_case.execute(input, &client).await?;

    Ok((
        StatusCode::CREATED,
        no_store(),
        Json(CreateOfferResponse {
            ok: true,
            id: created.id,
            created_at: created.created_at,
        }),
    ))
}

// ============================================================================
// Provider registration
// ============================================================================

/// POST /api/register_provider
pub async fn register_provider<R, V>(
    State(state): State<EnrollmentAppState<R, V>>,
    headers: HeaderMap,
    LenientJson(req): LenientJson<RegisterProviderRequest>,
) -> EnrollmentResult<impl IntoResponse>
where
    R: EnrollmentRepository,
    V: VerificationProvider + Clone + Sync + 'static,
{
    let use_case = RegisterProviderUseCase::new(state.repo.clone());

    let input = RegisterProviderInput {
        company_name: req.company_name,
        service_name: req.service_name,
        judet: req.judet,
        oras: req.oras,
        description: req.description,
        phone: req.phone,
        email: req.email,
        subcat: req.subcat,
        subsub: req.subsub,
        subsubs: req.subsubs,
        access_token: extract_bearer(&headers),
    };
    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        no_store(),
        Json(RegisterProviderResponse {
            ok: true,
            provider: output.provider,
        }),
    ))
}
