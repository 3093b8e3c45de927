//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the marketplace modules:
//! - Cryptographic utilities (HMAC-SHA256, base64url, random bytes)
//! - Bearer/cookie access-token extraction
//! - Client context (IP, User-Agent)
//! - Sliding-window rate limiting
//! - HTTP helpers (lenient JSON body, cache headers)
//! - Hosted database REST client and user lookup

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod hosted;
pub mod rate_limit;
pub mod web;
