use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use parley_bot::application::commands::{builtin_commands, builtin_registry};
use parley_bot::application::errors::{BotError, ConfigError};
use parley_bot::application::messaging::MessageDispatcher;
use parley_bot::domain::entities::{Flow, User};
use parley_bot::domain::traits::{Channel, Store};
use parley_bot::infrastructure::adapters::ConsoleAdapter;
use parley_bot::infrastructure::config::{Config, StorageBackend};
use parley_bot::infrastructure::database::SqliteStore;
use parley_bot::infrastructure::storage::{JsonStore, MemoryStore};

/// Exit status asking the supervisor to restart the bot
const RESTART_EXIT_CODE: u8 = 3;

const SQLITE_FILE: &str = "parley-bot.db";

#[derive(Parser)]
#[command(name = "parley-bot")]
#[command(about = "A chat bot with command trees, auto-responses and dialogs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console adapter
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
    /// Inspect or toggle auto-responses
    Options {
        #[command(subcommand)]
        action: OptionsAction,
    },
    /// Inspect or replace setting documents
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum OptionsAction {
    /// List auto-responses and their state
    List,
    /// Enable an auto-response
    Enable { name: String },
    /// Disable an auto-response
    Disable { name: String },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// List stored setting documents
    List,
    /// Print a setting document
    Show { name: String },
    /// Replace a setting document with the JSON in `file`
    Set { name: String, file: PathBuf },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Version => {
            println!("parley-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
        Commands::InitConfig => init_config(),
        Commands::Run => run_bot(load_config(&cli.config)).await,
        Commands::Options { action } => options_command(load_config(&cli.config), action).await,
        Commands::Settings { action } => settings_command(load_config(&cli.config), action).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &str) -> Config {
    if Path::new(path).exists() {
        Config::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    }
}

fn init_config() -> Result<ExitCode, BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(ExitCode::SUCCESS)
}

async fn open_store(config: &Config) -> Result<Arc<dyn Store>, BotError> {
    let path = &config.storage.path;
    match config.storage.backend {
        StorageBackend::Json => {
            let store = JsonStore::new(path);
            store.init().await?;
            tracing::info!("Using JSON store at {}", path.display());
            Ok(Arc::new(store))
        }
        StorageBackend::Sqlite => {
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| BotError::Storage(e.into()))?;
            let store = SqliteStore::new(path.join(SQLITE_FILE))?;
            tracing::info!("Using SQLite store at {}", path.join(SQLITE_FILE).display());
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store; settings and options are lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn run_bot(config: Config) -> Result<ExitCode, BotError> {
    tracing::info!("Starting parley-bot: {}", config.bot.name);

    let console_config = config.adapters.console.clone().unwrap_or_default();
    if !console_config.enabled {
        return Err(ConfigError::InvalidValue("no adapter is enabled".to_string()).into());
    }

    let store = open_store(&config).await?;
    let tree = builtin_commands()?;
    let registry = builtin_registry(store.clone(), &config.auto_responses.namespace, &config.bot.prefix).await?;
    tracing::info!("Loaded {} commands and {} auto-responses", tree.len(), registry.len());

    let admins = config.clone();
    let dispatcher = MessageDispatcher::new(config.bot.prefix.clone(), Arc::new(tree), Arc::new(registry), store)
        .with_timeouts(config.dialog_timeouts())
        .with_privilege_check(move |user: &User| admins.is_admin(&user.id));

    let console = ConsoleAdapter::from_stdin(&console_config, &config.bot.name);
    let info = console.bot_info();
    tracing::info!("Bot started: @{}", info.username);

    loop {
        let message = tokio::select! {
            message = console.next_message() => message,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, shutting down");
                return Ok(ExitCode::SUCCESS);
            }
        };

        let Some(message) = message else {
            tracing::info!("Input closed, shutting down");
            return Ok(ExitCode::SUCCESS);
        };

        if let Flow::Shutdown { reason } = dispatcher.process(message, &console).await {
            tracing::info!("Restart requested: {}", reason);
            return Ok(ExitCode::from(RESTART_EXIT_CODE));
        }
    }
}

async fn options_command(config: Config, action: OptionsAction) -> Result<ExitCode, BotError> {
    let store = open_store(&config).await?;
    let registry = builtin_registry(store, &config.auto_responses.namespace, &config.bot.prefix).await?;

    match action {
        OptionsAction::List => {
            for info in registry.refresh().await? {
                let state = if info.enabled { "enabled" } else { "disabled" };
                println!("{:16} {:8} {}", info.name, state, info.description);
            }
        }
        OptionsAction::Enable { name } => {
            registry.set_enabled(&name, true).await?;
            println!("{} has been enabled", name);
        }
        OptionsAction::Disable { name } => {
            registry.set_enabled(&name, false).await?;
            println!("{} has been disabled", name);
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn settings_command(config: Config, action: SettingsAction) -> Result<ExitCode, BotError> {
    let store = open_store(&config).await?;

    match action {
        SettingsAction::List => {
            for name in store.list_documents().await? {
                println!("{}", name);
            }
        }
        SettingsAction::Show { name } => {
            let value = store
                .load_document(&name)
                .await?
                .ok_or_else(|| BotError::NotFound(format!("setting '{}'", name)))?;
            let pretty = serde_json::to_string_pretty(&value).map_err(|e| BotError::Internal(e.to_string()))?;
            println!("{}", pretty);
        }
        SettingsAction::Set { name, file } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .map_err(|e| BotError::Storage(e.into()))?;
            let value: serde_json::Value = serde_json::from_str(&content)
                .map_err(|e| BotError::Internal(format!("{} is not valid JSON: {}", file.display(), e)))?;
            store.save_document(&name, &value).await?;
            println!("Setting '{}' updated", name);
        }
    }
    Ok(ExitCode::SUCCESS)
}
