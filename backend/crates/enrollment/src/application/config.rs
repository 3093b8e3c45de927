//! Application Configuration
//!
//! Configuration for the enrollment application layer.

use crate::domain::otp_token::{DEFAULT_TTL, OtpTokenSigner};
use platform::crypto::random_bytes;
use platform::rate_limit::RateLimitConfig;
use std::time::Duration;

/// Enrollment application configuration
#[derive(Debug, Clone)]
pub struct EnrollmentConfig {
    /// Signs the token handed out after a successful `otp_verify`
    pub otp_signer: OtpTokenSigner,
    /// Lifetime of that token (15 minutes)
    pub otp_session_ttl: Duration,
    /// `otp_start`: 5 calls per minute per IP
    pub otp_start_limit: RateLimitConfig,
    /// `otp_verify`: 8 calls per minute per IP
    pub otp_verify_limit: RateLimitConfig,
    /// `create-offer`: 10 calls per 30 seconds per IP
    pub offer_limit: RateLimitConfig,
    /// Offer descriptions are cut to this many characters
    pub description_max_chars: usize,
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            otp_signer: OtpTokenSigner::default(),
            otp_session_ttl: DEFAULT_TTL,
            otp_start_limit: RateLimitConfig::new(5, 60),
            otp_verify_limit: RateLimitConfig::new(8, 60),
            offer_limit: RateLimitConfig::new(10, 30),
            description_max_chars: 2000,
        }
    }
}

impl EnrollmentConfig {
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            otp_signer: OtpTokenSigner::new(secret),
            ..Default::default()
        }
    }

    /// Create config with a random token secret (for development).
    /// Tokens do not survive a restart.
    pub fn with_random_secret() -> Self {
        Self::with_secret(random_bytes(32))
    }
}
