//! OTP Start Use Case

use crate::application::config::EnrollmentConfig;
use crate::domain::repository::VerificationProvider;
use crate::domain::value_objects::{Channel, VerificationStatus};
use crate::error::{EnrollmentError, EnrollmentResult};
use kernel::validation::PhoneNumber;
use platform::client::ClientContext;
use platform::rate_limit::RateLimitStore;
use std::sync::Arc;

/// Input DTO for otp start
#[derive(Debug, Clone, Default)]
pub struct OtpStartInput {
    pub phone: Option<String>,
    pub channel: Option<String>,
}

/// Send a verification code to a phone
pub struct OtpStartUseCase<V, L>
where
    V: VerificationProvider,
    L: RateLimitStore,
{
    verifier: Arc<V>,
    limiter: Arc<L>,
    config: Arc<EnrollmentConfig>,
}

impl<V, L> OtpStartUseCase<V, L>
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
        input: OtpStartInput,
        client: &ClientContext,
    ) -> EnrollmentResult<VerificationStatus> {
        self.limiter
            .check_and_increment(&client.rate_key("otp_start"), &self.config.otp_start_limit)
            .await
            .ensure_allowed()?;

        let phone = PhoneNumber::parse(input.phone.as_deref().unwrap_or_default())?;
        let channel =
            Channel::parse(input.channel.as_deref()).ok_or(EnrollmentError::InvalidChannel)?;

        let status = self.verifier.start(&phone, channel).await?;

        tracing::info!(
            phone = %phone.masked(),
            channel = %channel,
            status = %status.as_str(),
            "Verification code sent"
        );

        Ok(status)
    }
}
