//! Application Layer - Use Cases

pub mod authenticate;
pub mod chat_echo;
pub mod config;
pub mod list_messages;
pub mod send_message;
