//! parley-bot: a chat bot core with prefixed command trees, toggleable
//! auto-responses and multi-step dialogs.

pub mod domain;
pub mod application;
pub mod infrastructure;
