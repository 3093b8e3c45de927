//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (offers, providers)
//! - Domain value objects (verification channel, subcategory links)
//! - OTP session tokens
//! - Repository and collaborator traits (interfaces)

pub mod entities;
pub mod otp_token;
pub mod repository;
pub mod value_objects;
