//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (services, subcategories, provider rows)
//! - Domain value objects (AreaFilter, ProviderQuery, TaxonomyMode)
//! - Domain services (grouping, counting, provider search)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
