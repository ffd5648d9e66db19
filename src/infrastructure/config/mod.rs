//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::errors::ConfigError;
use crate::application::messaging::DialogTimeouts;
use crate::application::services::DEFAULT_NAMESPACE;

/// Bot configuration. Missing sections fall back to their defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    pub dialog: DialogConfig,
    pub auto_responses: AutoResponseConfig,
    pub admins: AdminsConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    /// Documents and blobs as JSON files under `path`
    Json,
    /// Single SQLite database file at `path`
    Sqlite,
    /// Process memory only; nothing survives a restart
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DialogConfig {
    pub confirm_timeout_seconds: u64,
    pub content_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AutoResponseConfig {
    pub namespace: String,
}

/// Users allowed to run privileged commands
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdminsConfig {
    pub enabled: bool,
    pub users: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub chat_id: String,
    pub user_id: String,
    pub private: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chat_id: "console".to_string(),
            user_id: "console-user".to_string(),
            private: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "parley-bot".to_string(),
                prefix: ":".to_string(),
            },
            storage: StorageConfig {
                backend: StorageBackend::Json,
                path: PathBuf::from("data"),
            },
            dialog: DialogConfig {
                confirm_timeout_seconds: 40,
                content_timeout_seconds: 120,
            },
            auto_responses: AutoResponseConfig {
                namespace: DEFAULT_NAMESPACE.to_string(),
            },
            admins: AdminsConfig {
                enabled: true,
                users: vec!["console-user".to_string()],
            },
            adapters: AdaptersConfig {
                console: Some(ConsoleConfig::default()),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            config.bot.prefix = prefix;
        }

        if let Ok(dir) = std::env::var("BOT_DATA_DIR") {
            config.storage.path = PathBuf::from(dir);
        }

        if let Ok(admins) = std::env::var("BOT_ADMINS") {
            config.admins.users = admins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.prefix.is_empty() {
            return Err(ConfigError::MissingField("bot.prefix".to_string()));
        }
        if self.bot.prefix.contains(' ') {
            return Err(ConfigError::InvalidValue("bot.prefix must not contain spaces".to_string()));
        }
        if self.dialog.confirm_timeout_seconds == 0 || self.dialog.content_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue("dialog timeouts must be positive".to_string()));
        }
        if self.auto_responses.namespace.trim().is_empty() {
            return Err(ConfigError::MissingField("auto-responses.namespace".to_string()));
        }
        Ok(())
    }

    /// Check if a user ID may run privileged commands
    pub fn is_admin(&self, user_id: &str) -> bool {
        if !self.admins.enabled {
            return true; // Admin list disabled, everyone is privileged
        }
        self.admins.users.iter().any(|u| u == user_id)
    }

    pub fn dialog_timeouts(&self) -> DialogTimeouts {
        DialogTimeouts {
            confirm: Duration::from_secs(self.dialog.confirm_timeout_seconds),
            content: Duration::from_secs(self.dialog.content_timeout_seconds),
        }
    }
}
