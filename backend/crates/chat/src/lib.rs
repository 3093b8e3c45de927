//! Chat Backend Module
//!
//! Conversation messages between signed-in users and the assistant echo
//! endpoint. Every route requires the hosted database's access token.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases
//! - `infra/` - Hosted database implementation
//! - `presentation/` - HTTP handlers

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::config::ChatConfig;
pub use error::{ChatError, ChatResult};
pub use infra::hosted::HostedChatRepository;
pub use presentation::router::{chat_router, chat_router_generic};

#[cfg(test)]
mod tests;
