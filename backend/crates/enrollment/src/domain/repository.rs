//! Repository Traits
//!
//! Interfaces for persistence and for the SMS verification provider.
//! Implementations are in the infrastructure layer.

use crate::domain::entities::{CreatedOffer, CreatedProvider, NewOffer, NewProvider, ServiceRef};
use crate::domain::value_objects::{Channel, VerificationStatus};
use crate::error::{EnrollmentResult, VerificationError};
use kernel::validation::{OtpCode, PhoneNumber};
use platform::hosted::UserStore;

/// Offer persistence
#[trait_variant::make(OfferRepository: Send)]
pub trait LocalOfferRepository {
    /// Offers are written with privileged credentials; false when those are
    /// not configured.
    fn can_write_offers(&self) -> bool;

    async fn insert_offer(&self, offer: &NewOffer) -> EnrollmentResult<CreatedOffer>;
}

/// Provider registration persistence
#[trait_variant::make(ProviderRepository: Send)]
pub trait LocalProviderRepository {
    async fn list_services(&self) -> EnrollmentResult<Vec<ServiceRef>>;

    /// Fails with [`crate::error::EnrollmentError::CompanyExists`] on a
    /// duplicate company name.
    async fn insert_provider(&self, provider: &NewProvider) -> EnrollmentResult<CreatedProvider>;

    /// Which of `ids` exist in `subcategories`
    async fn existing_subcategories(&self, ids: &[i64]) -> EnrollmentResult<Vec<i64>>;

    /// Link a provider to a subcategory; an existing link is not an error.
    async fn link_subcategory(&self, provider_id: i64, subcategory_id: i64) -> EnrollmentResult<()>;
}

/// Sends and checks one-time codes.
#[trait_variant::make(VerificationProvider: Send)]
pub trait LocalVerificationProvider {
    /// Send a code; returns the provider status, usually `pending`.
    async fn start(
        &self,
        phone: &PhoneNumber,
        channel: Channel,
    ) -> Result<VerificationStatus, VerificationError>;

    /// Check a code; `approved` means it matched.
    async fn check(
        &self,
        phone: &PhoneNumber,
        code: &OtpCode,
    ) -> Result<VerificationStatus, VerificationError>;
}

/// Everything the enrollment routes persist or look up, bundled for handler bounds.
pub trait EnrollmentRepository:
    OfferRepository + ProviderRepository + UserStore + Clone + Send + Sync + 'static
{
}

impl<T> EnrollmentRepository for T where
    T: OfferRepository + ProviderRepository + UserStore + Clone + Send + Sync + 'static
{
}
