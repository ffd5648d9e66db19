//! Built-in commands and auto-responses
//!
//! Everything is registered explicitly here; `main` builds the tree and the
//! registry once and hands them to the dispatcher.

pub mod lifecycle;
pub mod options;
pub mod responders;
pub mod say;
pub mod settings;

use std::sync::Arc;

use crate::application::errors::{BotError, ConstructionError};
use crate::application::services::AutoResponseRegistry;
use crate::domain::entities::{AutoResponse, CommandSpec, CommandTree};
use crate::domain::traits::Store;

pub fn builtin_commands() -> Result<CommandTree, ConstructionError> {
    CommandTree::builder()
        .command(
            "options",
            CommandSpec::leaf(options::ListOptions)
                .with_description(
                    "Lists options. Can also be used in format: \"options [enable/disable] <option>\". \
                     See \"help options\" for more",
                )
                .wants_auto_responses()
                .with_subcommand(
                    "enable",
                    CommandSpec::leaf(options::ToggleOption::enable())
                        .with_description("\"options enable <option>\"")
                        .wants_auto_responses(),
                )
                .with_subcommand(
                    "disable",
                    CommandSpec::leaf(options::ToggleOption::disable())
                        .with_description("\"options disable <option>\"")
                        .wants_auto_responses(),
                ),
        )
        .command(
            "settings",
            CommandSpec::group()
                .with_description("A group of commands for managing the bot.")
                .with_subcommand(
                    "list",
                    CommandSpec::leaf(settings::ListSettings).with_description("Displays a list of editable settings."),
                )
                .with_subcommand(
                    "edit",
                    CommandSpec::leaf(settings::EditSetting)
                        .with_description("\"settings edit <setting>\" Edits a setting (admins only)."),
                ),
        )
        .command(
            "say",
            CommandSpec::leaf(say::Say).with_description("\"say [chat]\" Relays your next message as the bot (admins only)."),
        )
        .command(
            "update",
            CommandSpec::leaf(lifecycle::Restart).with_description("Restarts bot and checks for updates."),
        )
        .command(
            "restart",
            CommandSpec::leaf(lifecycle::Restart).with_description("Restarts bot and checks for updates."),
        )
        .build()
}

pub fn builtin_auto_responses(prefix: &str) -> Result<Vec<AutoResponse>, ConstructionError> {
    Ok(vec![
        AutoResponse::builder("help_incorrect", responders::HelpIncorrect::new(prefix)).build()?,
        AutoResponse::builder("auto_pong", responders::AutoPong).build()?,
    ])
}

/// Registry holding the built-in auto-responses
pub async fn builtin_registry(
    store: Arc<dyn Store>,
    namespace: &str,
    prefix: &str,
) -> Result<AutoResponseRegistry, BotError> {
    let mut registry = AutoResponseRegistry::new(store, namespace);
    for response in builtin_auto_responses(prefix)? {
        registry.register(response).await?;
    }
    Ok(registry)
}
