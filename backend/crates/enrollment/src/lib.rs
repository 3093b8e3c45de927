//! Enrollment Backend Module
//!
//! Everything that writes on behalf of visitors and providers:
//! - Phone verification through an SMS provider (`otp_start`, `otp_verify`)
//! - OTP session tokens proving a verified phone
//! - Offer requests (`create-offer`)
//! - Provider registration (`register_provider`)
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, OTP session token, repository traits
//! - `application/` - Use cases
//! - `infra/` - Hosted database and Twilio Verify implementations
//! - `presentation/` - HTTP handlers

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::config::EnrollmentConfig;
pub use error::{EnrollmentError, EnrollmentResult, VerificationError};
pub use infra::hosted::HostedEnrollmentRepository;
pub use infra::twilio::{TwilioConfig, TwilioVerify};
pub use presentation::router::{enrollment_router, enrollment_router_generic};
