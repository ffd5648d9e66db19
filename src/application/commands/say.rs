//! `say` - relay the author's next message as the bot

use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::application::messaging::{Collected, CommandContext, Confirmation, Dialog, DialogStage, DialogTimeouts};
use crate::domain::entities::{CommandHandler, Flow};

pub const CONTENT_PROMPT: &str = "Ok! Send the message to relay, or type 'exit' to cancel.";
pub const EMPTY_NOTICE: &str = "There is nothing to relay. Send some text, or type 'exit' to cancel.";
pub const DECLINED_NOTICE: &str = "Ok, nothing was sent.";

pub struct Say;

#[async_trait]
impl CommandHandler for Say {
    async fn handle(&self, ctx: CommandContext<'_>) -> Result<Flow, BotError> {
        ctx.require_privileged()?;

        // Chat ids can be case-sensitive, so take the argument as typed
        let target = ctx
            .message
            .raw_arg(1)
            .unwrap_or_else(|| ctx.message.chat_id())
            .to_string();

        let mut dialog = ctx.dialog();
        let stage = relay(&mut dialog, &target, ctx.timeouts).await?;
        tracing::info!(target = %target, author = %ctx.message.author().id, "say finished: {:?}", stage);
        Ok(Flow::Continue)
    }
}

/// Confirm, collect one non-empty message, and send it to `target`
pub async fn relay(dialog: &mut Dialog<'_>, target: &str, timeouts: DialogTimeouts) -> Result<DialogStage, BotError> {
    let here = target == dialog.state().chat_id;
    let prompt = if here {
        "Relay your next message into this chat? [Y/N]".to_string()
    } else {
        format!("Relay your next message to {}? [Y/N]", target)
    };

    match dialog.confirm(&prompt, timeouts.confirm).await? {
        Confirmation::Yes => {}
        Confirmation::No => {
            dialog.say(DECLINED_NOTICE).await?;
            return Ok(dialog.stage());
        }
        Confirmation::TimedOut | Confirmation::Closed => return Ok(dialog.stage()),
    }

    let collected = dialog
        .collect(Some(CONTENT_PROMPT), timeouts.content, |reply| {
            if reply.text.trim().is_empty() {
                Err(EMPTY_NOTICE.to_string())
            } else {
                Ok(reply.text.clone())
            }
        })
        .await?;

    match collected {
        Collected::Value(text) => {
            dialog.send_to(target, &text).await?;
            dialog.finish(DialogStage::Applied);
            if !here {
                dialog.say("Message relayed.").await?;
            }
            Ok(DialogStage::Applied)
        }
        Collected::Cancelled | Collected::TimedOut | Collected::Closed => Ok(dialog.stage()),
    }
}
