//! `options`, `options enable`, `options disable`

use async_trait::async_trait;

use crate::application::errors::{BotError, CommandError};
use crate::application::messaging::CommandContext;
use crate::domain::entities::{CommandHandler, Flow};

/// Lists every auto-response with its current flag
pub struct ListOptions;

#[async_trait]
impl CommandHandler for ListOptions {
    async fn handle(&self, ctx: CommandContext<'_>) -> Result<Flow, BotError> {
        let registry = ctx.auto_responses()?;
        let options = registry.refresh().await?;

        if options.is_empty() {
            ctx.reply("No auto-responses are registered.").await?;
            return Ok(Flow::Continue);
        }

        let text = options
            .iter()
            .map(|o| {
                format!(
                    "-----\n\"{}\": {};\n{}",
                    o.name,
                    if o.enabled { "enabled" } else { "disabled" },
                    o.description
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        ctx.reply(&text).await?;
        Ok(Flow::Continue)
    }
}

/// Turns one auto-response on or off
pub struct ToggleOption {
    enable: bool,
}

impl ToggleOption {
    pub fn enable() -> Self {
        Self { enable: true }
    }

    pub fn disable() -> Self {
        Self { enable: false }
    }

    fn verb(&self) -> &'static str {
        if self.enable {
            "enable"
        } else {
            "disable"
        }
    }
}

#[async_trait]
impl CommandHandler for ToggleOption {
    async fn handle(&self, ctx: CommandContext<'_>) -> Result<Flow, BotError> {
        let registry = ctx.auto_responses()?;

        // "options enable <name...>"
        let name = ctx.message.args_from(2).ok_or_else(|| {
            CommandError::InvalidArgs(format!(
                "Please give a valid option (\"{}options {} <option>\")",
                ctx.prefix,
                self.verb()
            ))
        })?;

        match registry.set_enabled(&name, self.enable).await {
            Ok(()) => ctx.reply(&format!("{} has been {}d", name, self.verb())).await?,
            Err(BotError::NotFound(_)) => ctx.reply(&format!("{} could not be found", name)).await?,
            Err(e) => return Err(e),
        }
        Ok(Flow::Continue)
    }
}
