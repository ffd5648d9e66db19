//! Built-in auto-responses

use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::{AutoResponder, NormalizedMessage};
use crate::domain::traits::Channel;

/// Says "pong" when someone says "ping"
pub struct AutoPong;

#[async_trait]
impl AutoResponder for AutoPong {
    async fn respond(&self, message: &NormalizedMessage, channel: &dyn Channel) -> Result<bool, BotError> {
        if message.raw().text.trim().to_lowercase() != "ping" {
            return Ok(false);
        }
        channel.send_text(message.chat_id(), "pong").await?;
        Ok(true)
    }

    fn description(&self) -> Option<&str> {
        Some("Says 'pong' when someone says 'ping' in the chat.")
    }
}

/// Points people who type "help" at the prefixed command
pub struct HelpIncorrect {
    prefix: String,
}

impl HelpIncorrect {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

#[async_trait]
impl AutoResponder for HelpIncorrect {
    async fn respond(&self, message: &NormalizedMessage, channel: &dyn Channel) -> Result<bool, BotError> {
        if message.raw().text.trim().to_lowercase() != "help" {
            return Ok(false);
        }
        channel
            .send_text(message.chat_id(), &format!("Did you mean \"{}help\" ?", self.prefix))
            .await?;
        Ok(true)
    }

    fn description(&self) -> Option<&str> {
        Some("For when someone types 'help' without the command prefix.")
    }
}
