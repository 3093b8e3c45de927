//! Shared Kernel - Domain-crossing minimal core
//!
//! The vocabulary every marketplace module agrees on:
//! - Unified error type ([`error::app_error::AppError`]) and its HTTP mapping
//! - Input validation value objects (phone, email, OTP code, numeric ids)
//! - Diacritic-insensitive text normalization used for name matching
//!
//! Nothing here performs I/O.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod text;
pub mod validation;
