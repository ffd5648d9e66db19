//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: In-memory and JSON-file stores
//! - Database: SQLite store
//! - Adapters: Platform integrations (console)

pub mod config;
pub mod storage;
pub mod database;
pub mod adapters;
