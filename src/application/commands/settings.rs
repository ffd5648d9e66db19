//! `settings list` and the interactive `settings edit`

use async_trait::async_trait;
use serde_json::Value;

use crate::application::errors::{BotError, CommandError, StorageError};
use crate::application::messaging::{Collected, CommandContext, Confirmation, Dialog, DialogStage, DialogTimeouts};
use crate::domain::entities::{CommandHandler, Flow};
use crate::domain::traits::Store;

pub const CONFIRM_PROMPT: &str = "Is this the file you want to edit? [Y/N]";
pub const CONTENT_PROMPT: &str =
    "Ok! Please send an edited version of the above file to change settings. Make sure the format is valid!";
pub const DECLINED_NOTICE: &str =
    "Ok. If you meant another file, go ahead and just re-enter the command. Exiting command now.";
pub const INVALID_JSON_NOTICE: &str = "I'm sorry, I couldn't read that! The text needs to be valid JSON. \
     Try re-entering the text, or type 'exit' or just do nothing for a bit if you want to stop.";
pub const UPDATED_NOTICE: &str = "Settings have been updated! Exiting command now...";
pub const UPDATED_WARNING: &str = "I will warn you though... If something breaks pretty soon, \
     you might want to check back here and see if you changed everything correctly.";

/// Displays the names of all stored setting documents
pub struct ListSettings;

#[async_trait]
impl CommandHandler for ListSettings {
    async fn handle(&self, ctx: CommandContext<'_>) -> Result<Flow, BotError> {
        let names = ctx.store.list_documents().await?;
        if names.is_empty() {
            ctx.reply("No settings found.").await?;
        } else {
            let lines: Vec<String> = names.iter().map(|n| format!("-- '{}'", n)).collect();
            ctx.reply(&lines.join("\n")).await?;
        }
        Ok(Flow::Continue)
    }
}

/// Replaces a setting document through a confirm-then-collect dialog
pub struct EditSetting;

#[async_trait]
impl CommandHandler for EditSetting {
    async fn handle(&self, ctx: CommandContext<'_>) -> Result<Flow, BotError> {
        ctx.require_privileged()?;

        // Document names are case-sensitive
        let name = ctx.message.raw_args_from(2).ok_or_else(|| {
            CommandError::InvalidArgs(format!(
                "Please name a setting to edit (\"{}settings edit <setting>\")",
                ctx.prefix
            ))
        })?;

        let exists = match ctx.store.load_document(&name).await {
            Ok(found) => found.is_some(),
            Err(StorageError::InvalidName(_)) => false,
            Err(e) => return Err(e.into()),
        };
        if !exists {
            ctx.reply(&format!(
                "No setting called '{}' found. Please use '{}settings list'.",
                name, ctx.prefix
            ))
            .await?;
            return Ok(Flow::Continue);
        }

        let mut dialog = ctx.dialog();
        let stage = edit_setting(ctx.store, &mut dialog, &name, ctx.timeouts).await?;
        tracing::info!(
            setting = %name,
            author = %ctx.message.author().id,
            "settings edit finished: {:?}",
            stage
        );
        Ok(Flow::Continue)
    }
}

/// Run the edit dialog for document `name`. Nothing is written unless the
/// dialog reaches `Applied`.
pub async fn edit_setting(
    store: &dyn Store,
    dialog: &mut Dialog<'_>,
    name: &str,
    timeouts: DialogTimeouts,
) -> Result<DialogStage, BotError> {
    let Some(current) = store.load_document(name).await? else {
        dialog.say(&format!("No setting called '{}' found.", name)).await?;
        return Ok(dialog.finish(DialogStage::Cancelled));
    };
    let pretty = serde_json::to_string_pretty(&current).map_err(|e| CommandError::ExecutionFailed(e.to_string()))?;

    dialog.say(name).await?;
    dialog.say(&pretty).await?;

    match dialog.confirm(CONFIRM_PROMPT, timeouts.confirm).await? {
        Confirmation::Yes => {}
        Confirmation::No => {
            dialog.say(DECLINED_NOTICE).await?;
            return Ok(dialog.stage());
        }
        Confirmation::TimedOut | Confirmation::Closed => return Ok(dialog.stage()),
    }

    let collected = dialog
        .collect(Some(CONTENT_PROMPT), timeouts.content, |reply| {
            serde_json::from_str::<Value>(&reply.text).map_err(|_| INVALID_JSON_NOTICE.to_string())
        })
        .await?;

    match collected {
        Collected::Value(value) => {
            store.save_document(name, &value).await?;
            dialog.finish(DialogStage::Applied);
            dialog.say(UPDATED_NOTICE).await?;
            dialog.say(UPDATED_WARNING).await?;
            Ok(DialogStage::Applied)
        }
        Collected::Cancelled | Collected::TimedOut | Collected::Closed => Ok(dialog.stage()),
    }
}
