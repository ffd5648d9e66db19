//! Domain layer - Core business objects and boundaries
//!
//! This layer contains:
//! - Entities: Core business objects (User, Message, CommandTree, AutoResponse)
//! - Traits: Abstractions for infrastructure (Channel, Store)

pub mod entities;
pub mod traits;
