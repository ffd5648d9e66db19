use async_trait::async_trait;
use crate::domain::entities::{Message, User};
use crate::application::errors::BotError;

/// Channel trait - abstraction for the chat transport
#[async_trait]
pub trait Channel: Send + Sync {
    /// Send a text message to a chat
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), BotError>;

    /// Wait for the next message from `author` in `chat_id`.
    ///
    /// Returns `None` once the transport has no more messages to deliver.
    /// Must be cancel-safe: callers bound this wait with a timeout.
    async fn await_message(&self, chat_id: &str, author: &User) -> Result<Option<Message>, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
