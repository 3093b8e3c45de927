//! Application Layer - Use Cases
//!
//! Orchestrates repository reads and the pure domain services.

pub mod categories;
pub mod config;
pub mod lists;
pub mod provider_page;
pub mod search_providers;
pub mod selects;
pub mod taxonomy;
