//! Interactive dialogs - timeout-bounded multi-turn exchanges with one author
//!
//! Every wait gets its own timeout window. Retries after an unreadable reply
//! wait again with a fresh window, so a dialog as a whole is unbounded but no
//! single wait is.

use std::time::Duration;

use crate::application::errors::BotError;
use crate::domain::entities::{Message, User};
use crate::domain::traits::Channel;

pub const CANCEL_KEYWORD: &str = "exit";
pub const TIMEOUT_NOTICE: &str = "You have taken too long to respond, please re-enter the initial command.";
pub const CANCEL_NOTICE: &str = "Canceling command...";
pub const CONFIRM_RETRY_NOTICE: &str = "Sorry, I couldn't read that. Please enter either 'y' or 'n'.";

/// Stage-specific wait limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogTimeouts {
    pub confirm: Duration,
    pub content: Duration,
}

impl Default for DialogTimeouts {
    fn default() -> Self {
        Self {
            confirm: Duration::from_secs(40),
            content: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogStage {
    Start,
    AwaitingConfirmation,
    AwaitingContent,
    Applied,
    Cancelled,
    TimedOut,
}

impl DialogStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, DialogStage::Applied | DialogStage::Cancelled | DialogStage::TimedOut)
    }
}

/// Ephemeral state of one dialog, never persisted
#[derive(Debug, Clone)]
pub struct DialogState {
    pub author: User,
    pub chat_id: String,
    pub stage: DialogStage,
    pub timeout: Duration,
}

/// Outcome of a single bounded wait
#[derive(Debug)]
pub enum Reply {
    Message(Message),
    TimedOut,
    /// The transport stopped delivering messages
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    TimedOut,
    Closed,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Collected<T> {
    Value(T),
    Cancelled,
    TimedOut,
    Closed,
}

pub struct Dialog<'a> {
    channel: &'a dyn Channel,
    state: DialogState,
}

impl<'a> Dialog<'a> {
    pub fn new(channel: &'a dyn Channel, chat_id: impl Into<String>, author: User) -> Self {
        Self {
            channel,
            state: DialogState {
                author,
                chat_id: chat_id.into(),
                stage: DialogStage::Start,
                timeout: Duration::ZERO,
            },
        }
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn stage(&self) -> DialogStage {
        self.state.stage
    }

    fn enter(&mut self, stage: DialogStage, timeout: Duration) {
        tracing::debug!(
            chat = %self.state.chat_id,
            author = %self.state.author.id,
            "dialog {:?} -> {:?}",
            self.state.stage,
            stage
        );
        self.state.stage = stage;
        self.state.timeout = timeout;
    }

    /// Move to a terminal stage and return it
    pub fn finish(&mut self, stage: DialogStage) -> DialogStage {
        debug_assert!(stage.is_terminal());
        self.enter(stage, Duration::ZERO);
        stage
    }

    /// Send a line to the dialog's chat
    pub async fn say(&self, text: &str) -> Result<(), BotError> {
        self.channel.send_text(&self.state.chat_id, text).await
    }

    /// Send a line to another chat through the dialog's transport
    pub async fn send_to(&self, chat_id: &str, text: &str) -> Result<(), BotError> {
        self.channel.send_text(chat_id, text).await
    }

    /// Wait up to `timeout` for the author's next message
    pub async fn await_reply(&self, timeout: Duration) -> Result<Reply, BotError> {
        let wait = self.channel.await_message(&self.state.chat_id, &self.state.author);
        match tokio::time::timeout(timeout, wait).await {
            Err(_) => Ok(Reply::TimedOut),
            Ok(Ok(Some(message))) => Ok(Reply::Message(message)),
            Ok(Ok(None)) => Ok(Reply::Closed),
            Ok(Err(e)) => Err(e),
        }
    }

    async fn timed_out(&mut self) -> Result<(), BotError> {
        self.finish(DialogStage::TimedOut);
        self.say(TIMEOUT_NOTICE).await
    }

    /// Ask a yes/no question until the author answers with something starting
    /// with `y` or `n`.
    pub async fn confirm(&mut self, prompt: &str, timeout: Duration) -> Result<Confirmation, BotError> {
        self.enter(DialogStage::AwaitingConfirmation, timeout);
        self.say(prompt).await?;

        loop {
            let message = match self.await_reply(timeout).await? {
                Reply::Message(message) => message,
                Reply::TimedOut => {
                    self.timed_out().await?;
                    return Ok(Confirmation::TimedOut);
                }
                Reply::Closed => {
                    self.finish(DialogStage::Cancelled);
                    return Ok(Confirmation::Closed);
                }
            };

            let answer = message.text.trim().to_lowercase();
            if answer.starts_with('y') {
                return Ok(Confirmation::Yes);
            }
            if answer.starts_with('n') {
                self.finish(DialogStage::Cancelled);
                return Ok(Confirmation::No);
            }
            self.say(CONFIRM_RETRY_NOTICE).await?;
        }
    }

    /// Collect content until `parse` accepts a reply, the author types the
    /// cancel keyword, or a wait times out. `parse` returns the notice to send
    /// when it rejects a reply.
    pub async fn collect<T, F>(&mut self, prompt: Option<&str>, timeout: Duration, mut parse: F) -> Result<Collected<T>, BotError>
    where
        T: Send,
        F: FnMut(&Message) -> Result<T, String> + Send,
    {
        self.enter(DialogStage::AwaitingContent, timeout);
        if let Some(prompt) = prompt {
            self.say(prompt).await?;
        }

        loop {
            let message = match self.await_reply(timeout).await? {
                Reply::Message(message) => message,
                Reply::TimedOut => {
                    self.timed_out().await?;
                    return Ok(Collected::TimedOut);
                }
                Reply::Closed => {
                    self.finish(DialogStage::Cancelled);
                    return Ok(Collected::Closed);
                }
            };

            if message.text.trim().eq_ignore_ascii_case(CANCEL_KEYWORD) {
                self.finish(DialogStage::Cancelled);
                self.say(CANCEL_NOTICE).await?;
                return Ok(Collected::Cancelled);
            }

            match parse(&message) {
                Ok(value) => return Ok(Collected::Value(value)),
                Err(notice) => self.say(&notice).await?,
            }
        }
    }
}
