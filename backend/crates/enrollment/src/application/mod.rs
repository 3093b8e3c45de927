//! Application Layer - Use Cases
//!
//! Phone verification, offer submission and provider registration.

pub mod config;
pub mod create_offer;
pub mod otp_start;
pub mod otp_verify;
pub mod register_provider;
