//! Domain entities - Core business objects

pub mod user;
pub mod message;
pub mod command;
pub mod auto_response;

pub use user::User;
pub use message::{Message, NormalizedMessage};
pub use command::{
    CommandHandler, CommandNode, CommandSpec, CommandTree, CommandTreeBuilder, Flow, Handler, Resolution,
};
pub use auto_response::{AutoResponder, AutoResponse, AutoResponseBuilder};
