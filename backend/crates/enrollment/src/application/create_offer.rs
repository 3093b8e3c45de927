//! Create Offer Use Case

use crate::application::config::EnrollmentConfig;
use crate::domain::entities::{CreatedOffer, NewOffer};
use crate::domain::repository::OfferRepository;
use crate::domain::value_objects::json_id;
use crate::error::{EnrollmentError, EnrollmentResult};
use kernel::validation::{Email, PhoneNumber, clamp_text};
use platform::client::ClientContext;
use platform::hosted::UserStore;
use platform::rate_limit::RateLimitStore;
use serde_json::Value;
use std::sync::Arc;

/// Input DTO for create offer
#[derive(Debug, Clone, Default)]
pub struct CreateOfferInput {
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Number or numeric string
    pub service_id: Value,
    pub description: Option<String>,
    pub otp_token: Option<String>,
    pub meta: Value,
    /// Caller's access token, if signed in
    pub access_token: Option<String>,
}

/// Store an offer request from a phone-verified visitor
pub struct CreateOfferUseCase<R, L>
where
    R: OfferRepository + UserStore,
    L: RateLimitStore,
{
    repo: Arc<R>,
    limiter: Arc<L>,
    config: Arc<EnrollmentConfig>,
}

impl<R, L> CreateOfferUseCase<R, L>
where
    R: OfferRepository + UserStore,
    L: RateLimitStore,
{
    pub fn new(repo: Arc<R>, limiter: Arc<L>, config: Arc<EnrollmentConfig>) -> Self {
        Self {
            repo,
            limiter,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: CreateOfferInput,
        client: &ClientContext,
    ) -> EnrollmentResult<CreatedOffer> {
        self.limiter
            .check_and_increment(&client.rate_key("offer"), &self.config.offer_limit)
            .await
            .ensure_allowed()?;

        if !self.repo.can_write_offers() {
            return Err(EnrollmentError::Misconfigured("SUPABASE_SERVICE_ROLE_KEY"));
        }

        let email = Email::parse(input.email.as_deref().unwrap_or_default())?;
        let phone = PhoneNumber::parse(input.phone.as_deref().unwrap_or_default())?;
        let service_id = match &input.service_id {
            Value::Null => return Err(EnrollmentError::ServiceRequired),
            Value::String(s) if s.trim().is_empty() => return Err(EnrollmentError::ServiceRequired),
            other => json_id(other).ok_or(EnrollmentError::InvalidServiceId)?,
        };
        let description = clamp_text(
            input.description.as_deref().unwrap_or_default(),
            self.config.description_max_chars,
        );

        let verified = self
            .config
            .otp_signer
            .verify(input.otp_token.as_deref().unwrap_or_default())
            .map_err(EnrollmentError::OtpSession)?;
        if verified.claims.phone != phone.as_str() {
            return Err(EnrollmentError::OtpPhoneMismatch);
        }

        let created_by = match input.access_token.as_deref() {
            Some(token) => match self.repo.user_for_token(token).await {
                Ok(user) => user.map(|u| u.id),
                Err(e) => {
                    tracing::debug!(error = %e, "Ignoring failed user lookup for offer");
                    None
                }
            },
            None => None,
        };

        let offer = NewOffer {
            email: email.as_str().to_string(),
            phone: phone.as_str().to_string(),
            service_id,
            description,
            source_ip: client.ip.map(|ip| ip.to_string()),
            user_agent: client.user_agent.clone(),
            created_by,
            meta: input.meta,
        };

        let created = self.repo.insert_offer(&offer).await?;

        tracing::info!(
            offer_id = created.id,
            service_id,
            phone = %phone.masked(),
            signed_in = offer.created_by.is_some(),
            "Offer created"
        );

        Ok(created)
    }
}
