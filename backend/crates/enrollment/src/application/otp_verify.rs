//! OTP Verify Use Case
//!
//! An approved check is exchanged for an OTP session token, which
//! `create-offer` later requires for the same phone.

use crate::application::config::EnrollmentConfig;
use crate::domain::otp_token::TokenError;
use crate::domain::repository::VerificationProvider;
use crate::domain::value_objects::VerificationStatus;
use crate::error::{EnrollmentError, EnrollmentResult};
use kernel::validation::{OtpCode, PhoneNumber};
use platform::client::ClientContext;
use platform::rate_limit::RateLimitStore;
use std::sync::Arc;

/// Input DTO for otp verify
#[derive(Debug, Clone, Default)]
pub struct OtpVerifyInput {
    pub phone: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpVerifyOutput {
    Approved {
        status: VerificationStatus,
        otp_session: String,
        /// Token lifetime in seconds
        expires_in: u64,
    },
    /// Wrong or expired code; carries the provider status
    Rejected { status: VerificationStatus },
}

pub struct OtpVerifyUseCase<V, L>
where
    V: VerificationProvider,
    L: RateLimitStore,
{
    verifier: Arc<V>,
    limiter: Arc<L>,
    config: Arc<EnrollmentConfig>,
}

impl<V, L> OtpVerifyUseCase<V, L>
where
    V: VerificationProvider,
    L: RateLimitStore,
{
    pub fn new(verifier: Arc<V>, limiter: Arc<L>, config: Arc<EnrollmentConfig>) -> Self {
        Self {
            verifier,
            limiter,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: OtpVerifyInput,
        client: &ClientContext,
    ) -> EnrollmentResult<OtpVerifyOutput> {
        self.limiter
            .check_and_increment(&client.rate_key("otp_verify"), &self.config.otp_verify_limit)
            .await
            .ensure_allowed()?;

        let phone = PhoneNumber::parse(input.phone.as_deref().unwrap_or_default())?;
        let code = OtpCode::parse(input.code.as_deref().unwrap_or_default())?;

        let status = self.verifier.check(&phone, &code).await?;
        if !status.is_approved() {
            tracing::info!(
                phone = %phone.masked(),
                status = %status.as_str(),
                "Verification code rejected"
            );
            return Ok(OtpVerifyOutput::Rejected { status });
        }

        let ttl = self.config.otp_session_ttl;
        let otp_session = self
            .config
            .otp_signer
            .issue(phone.as_str(), ttl)
            .map_err(|e| match e {
                TokenError::NoSecret => EnrollmentError::Misconfigured("OTP_SESSION_SECRET"),
                other => EnrollmentError::OtpSession(other),
            })?;

        tracing::info!(phone = %phone.masked(), "Phone verified");

        Ok(OtpVerifyOutput::Approved {
            status,
            otp_session,
            expires_in: ttl.as_secs().max(1),
        })
    }
}
