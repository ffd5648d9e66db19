//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Auto-response registry
//! - Commands: Built-in commands and auto-responses
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing, dispatching, help and dialogs

pub mod errors;
pub mod services;
pub mod messaging;
pub mod commands;
