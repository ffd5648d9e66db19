use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::application::messaging::CommandContext;
use crate::domain::entities::{CommandHandler, Flow};

/// Asks the run loop to stop so the supervisor can update and restart the bot
pub struct Restart;

#[async_trait]
impl CommandHandler for Restart {
    async fn handle(&self, ctx: CommandContext<'_>) -> Result<Flow, BotError> {
        ctx.require_privileged()?;
        tracing::debug!("attempting restart");
        ctx.reply("restarting...").await?;
        Ok(Flow::Shutdown {
            reason: format!("{} requested by {}", ctx.message.first_token(), ctx.message.author().id),
        })
    }
}
