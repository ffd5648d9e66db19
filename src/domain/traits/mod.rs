//! Domain traits - Abstractions for infrastructure implementations

pub mod channel;
pub mod store;

pub use channel::{BotInfo, Channel};
pub use store::Store;
