//! Infrastructure Layer - Hosted database implementations

pub mod hosted;
