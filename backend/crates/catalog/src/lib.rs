//! Catalog Backend Module
//!
//! Public, cacheable reads: the service taxonomy, county and city lists,
//! provider search and provider pages.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, aggregation, repository traits
//! - `application/` - Use cases
//! - `infra/` - Hosted database implementation
//! - `presentation/` - HTTP handlers
//!
//! Area and service names are compared without diacritics or case, so
//! `"Brașov"`, `"brasov"` and `"Brasov "` select the same providers.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use infra::hosted::HostedCatalogRepository;
pub use presentation::router::{catalog_router, catalog_router_generic};
