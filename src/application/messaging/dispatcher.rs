//! Message dispatcher - Routes messages to commands, help, or auto-responses

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::application::errors::{BotError, CommandError};
use crate::application::services::AutoResponseRegistry;
use crate::domain::entities::{CommandTree, Flow, Handler, Message, NormalizedMessage, User};
use crate::domain::traits::{Channel, Store};

use super::context::CommandContext;
use super::dialog::DialogTimeouts;
use super::help::{render_help, HELP_KEYWORD};
use super::parser::MessageParser;

/// Decides whether an author may run privileged commands
pub type PrivilegeCheck = Arc<dyn Fn(&User) -> bool + Send + Sync>;

pub const APOLOGY: &str = "Sorry, something went wrong while running that command.";

/// Message dispatcher - normalizes messages and routes them to handlers
pub struct MessageDispatcher {
    parser: MessageParser,
    tree: Arc<CommandTree>,
    auto_responses: Arc<AutoResponseRegistry>,
    store: Arc<dyn Store>,
    timeouts: DialogTimeouts,
    is_privileged: PrivilegeCheck,
}

impl MessageDispatcher {
    pub fn new(
        prefix: impl Into<String>,
        tree: Arc<CommandTree>,
        auto_responses: Arc<AutoResponseRegistry>,
        store: Arc<dyn Store>,
    ) -> Self {
        Self {
            parser: MessageParser::new(prefix),
            tree,
            auto_responses,
            store,
            timeouts: DialogTimeouts::default(),
            is_privileged: Arc::new(|_| false),
        }
    }

    pub fn with_timeouts(mut self, timeouts: DialogTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_privilege_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&User) -> bool + Send + Sync + 'static,
    {
        self.is_privileged = Arc::new(check);
        self
    }

    pub fn parser(&self) -> &MessageParser {
        &self.parser
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn auto_responses(&self) -> &AutoResponseRegistry {
        &self.auto_responses
    }

    /// Handle one incoming message to completion. Failures are logged and
    /// reported in the originating chat; they never escape, so the caller's
    /// loop always moves on to the next event.
    pub async fn process(&self, message: Message, channel: &dyn Channel) -> Flow {
        if message.sender.is_bot {
            tracing::debug!("[{}] ignoring message from bot {}", message.chat_id, message.sender.id);
            return Flow::Continue;
        }

        let message = self.parser.normalize(message);
        let outcome = AssertUnwindSafe(self.dispatch(&message, channel))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(BotError::Internal(format!("handler panicked: {}", panic_message(&*panic)))));

        match outcome {
            Ok(flow) => flow,
            Err(e) => {
                self.report_failure(&message, channel, e).await;
                Flow::Continue
            }
        }
    }

    /// Route a normalized message. Unknown commands are ignored.
    pub async fn dispatch(&self, message: &NormalizedMessage, channel: &dyn Channel) -> Result<Flow, BotError> {
        if !message.is_command() {
            self.auto_responses.dispatch_free_text(message, channel).await;
            return Ok(Flow::Continue);
        }

        let first = message.first_token();
        if first == HELP_KEYWORD || first.is_empty() {
            let text = render_help(message.tokens(), &self.tree);
            channel.send_text(message.chat_id(), &text).await?;
            return Ok(Flow::Continue);
        }

        let Some(resolution) = self.tree.resolve(message.tokens()) else {
            tracing::debug!("[{}] no command matches {:?}", message.chat_id(), message.tokens());
            return Ok(Flow::Continue);
        };

        let node = resolution.node;
        let handler = match node.handler() {
            Handler::Leaf(handler) => handler,
            Handler::Group => {
                tracing::debug!("[{}] '{}' is a command group, nothing to run", message.chat_id(), resolution.name());
                return Ok(Flow::Continue);
            }
        };

        tracing::info!(
            command = %resolution.name(),
            author = %message.author().id,
            chat = %message.chat_id(),
            "running command"
        );

        let ctx = CommandContext {
            message,
            channel,
            store: self.store.as_ref(),
            timeouts: self.timeouts,
            prefix: self.parser.prefix(),
            privileged: (self.is_privileged)(message.author()),
            command_tree: node.wants_command_tree().then(|| self.tree.as_ref()),
            auto_responses: node.wants_auto_responses().then(|| self.auto_responses.as_ref()),
        };

        handler.handle(ctx).await
    }

    async fn report_failure(&self, message: &NormalizedMessage, channel: &dyn Channel, err: BotError) {
        let command = self
            .tree
            .resolve(message.tokens())
            .map(|r| r.name())
            .unwrap_or_else(|| message.first_token().to_string());
        let author = &message.author().id;
        let chat = message.chat_id();

        let notice = match &err {
            BotError::Command(CommandError::InvalidArgs(usage)) => {
                tracing::debug!(command = %command, author = %author, chat = %chat, "invalid arguments");
                usage.clone()
            }
            BotError::Command(CommandError::PermissionDenied) => {
                tracing::warn!(command = %command, author = %author, chat = %chat, "permission denied");
                format!(
                    "Sorry, you don't have permission to use \"{}{}\".",
                    self.parser.prefix(),
                    command
                )
            }
            _ => {
                tracing::error!(command = %command, author = %author, chat = %chat, error = %err, "command failed");
                APOLOGY.to_string()
            }
        };

        if let Err(e) = channel.send_text(chat, &notice).await {
            tracing::error!("[{}] failed to report command failure: {}", chat, e);
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(text) = panic.downcast_ref::<&str>() {
        text
    } else if let Some(text) = panic.downcast_ref::<String>() {
        text
    } else {
        "unknown panic"
    }
}
