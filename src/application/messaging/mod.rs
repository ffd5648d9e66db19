//! Message handling - Normalization, dispatch, help and dialogs

pub mod context;
pub mod dialog;
pub mod dispatcher;
pub mod help;
pub mod parser;

pub use context::CommandContext;
pub use dialog::{Collected, Confirmation, Dialog, DialogStage, DialogState, DialogTimeouts, Reply};
pub use dispatcher::{MessageDispatcher, PrivilegeCheck};
pub use help::render_help;
pub use parser::MessageParser;
