//! Enrollment Router

use crate::application::config::EnrollmentConfig;
use crate::domain::repository::{EnrollmentRepository, VerificationProvider};
use crate::infra::hosted::HostedEnrollmentRepository;
use crate::infra::twilio::TwilioVerify;
use crate::presentation::handlers::{self, EnrollmentAppState};
use axum::{Router, routing::post};
use platform::rate_limit::SlidingWindowStore;
use std::sync::Arc;

/// Create the enrollment router backed by the hosted database and Twilio Verify
pub fn enrollment_router(
    repo: HostedEnrollmentRepository,
    verifier: TwilioVerify,
    limiter: Arc<SlidingWindowStore>,
    config: EnrollmentConfig,
) -> Router {
    enrollment_router_generic(repo, verifier, limiter, config)
}

/// Create an enrollment router for any repository and verification provider
///
/// The limiter is shared so one client keeps one budget across routers.
pub fn enrollment_router_generic<R, V>(
    repo: R,
    verifier: V,
    limiter: Arc<SlidingWindowStore>,
    config: EnrollmentConfig,
) -> Router
where
    R: EnrollmentRepository,
    V: VerificationProvider + Clone + Sync + 'static,
{
    let state = EnrollmentAppState {
        repo: Arc::new(repo),
        verifier: Arc::new(verifier),
        limiter,
        config: Arc::new(config),
    };

    Router::new()
        .route("/otp_start", post(handlers::otp_start::<R, V>))
        .route("/otp_verify", post(handlers::otp_verify::<R, V>))
        .route("/create-offer", post(handlers::create_offer::<R, V>))
        .route("/offers", post(handlers::create_offer::<R, V>))
        .route("/register_provider", post(handlers::register_provider::<R, V>))
        .with_state(state)
}
