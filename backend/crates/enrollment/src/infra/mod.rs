//! Infrastructure Layer - Hosted database and SMS provider implementations

pub mod hosted;
pub mod twilio;
