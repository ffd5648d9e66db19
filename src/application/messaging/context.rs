//! Context handed to command handlers

use crate::application::errors::{BotError, CommandError};
use crate::application::services::AutoResponseRegistry;
use crate::domain::entities::{CommandTree, NormalizedMessage};
use crate::domain::traits::{Channel, Store};

use super::dialog::{Dialog, DialogTimeouts};

/// Everything a command handler may touch while it runs.
///
/// The command tree and the auto-response registry are only present when the
/// resolved node asked for them at construction time.
pub struct CommandContext<'a> {
    pub message: &'a NormalizedMessage,
    pub channel: &'a dyn Channel,
    pub store: &'a dyn Store,
    pub timeouts: DialogTimeouts,
    pub prefix: &'a str,
    pub privileged: bool,
    pub(crate) command_tree: Option<&'a CommandTree>,
    pub(crate) auto_responses: Option<&'a AutoResponseRegistry>,
}

impl<'a> CommandContext<'a> {
    pub fn command_tree(&self) -> Result<&'a CommandTree, BotError> {
        self.command_tree
            .ok_or_else(|| BotError::Internal("command did not declare it needs the command tree".to_string()))
    }

    pub fn auto_responses(&self) -> Result<&'a AutoResponseRegistry, BotError> {
        self.auto_responses
            .ok_or_else(|| BotError::Internal("command did not declare it needs the auto-responses".to_string()))
    }

    pub fn require_privileged(&self) -> Result<(), BotError> {
        if self.privileged {
            Ok(())
        } else {
            Err(CommandError::PermissionDenied.into())
        }
    }

    /// Reply in the chat the command came from
    pub async fn reply(&self, text: &str) -> Result<(), BotError> {
        self.channel.send_text(self.message.chat_id(), text).await
    }

    /// Start a dialog with the invoking author in the invoking chat
    pub fn dialog(&self) -> Dialog<'a> {
        Dialog::new(self.channel, self.message.chat_id(), self.message.author().clone())
    }
}
