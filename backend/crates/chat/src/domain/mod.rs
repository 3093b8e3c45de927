//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (chat messages)
//! - Domain value objects (chat id, paging, echo reply)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod value_objects;
