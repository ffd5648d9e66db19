use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::application::errors::{BotError, ConstructionError, StorageError};
use crate::domain::entities::{AutoResponse, NormalizedMessage};
use crate::domain::traits::{Channel, Store};

/// Key namespace for persisted enable flags
pub const DEFAULT_NAMESPACE: &str = "commands.options";

struct Registered {
    response: AutoResponse,
    // Cache only; the persisted flag is authoritative
    enabled: AtomicBool,
}

/// Snapshot of one registered auto-response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoResponseInfo {
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub allow_in_private: bool,
}

/// Holds every auto-response and its persisted on/off flag
pub struct AutoResponseRegistry {
    store: Arc<dyn Store>,
    namespace: String,
    entries: Vec<Registered>,
    // Serializes load-mutate-save of flags
    flags: Mutex<()>,
}

impl AutoResponseRegistry {
    pub fn new(store: Arc<dyn Store>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            entries: Vec::new(),
            flags: Mutex::new(()),
        }
    }

    fn key(&self, name: &str) -> String {
        format!("{}.{}", self.namespace, name)
    }

    fn entry(&self, name: &str) -> Option<&Registered> {
        self.entries.iter().find(|e| e.response.name() == name)
    }

    /// Chat tokens arrive lower-cased, so lookups by user input ignore case
    fn find(&self, name: &str) -> Option<&Registered> {
        self.entry(name).or_else(|| {
            let wanted = name.to_lowercase();
            self.entries.iter().find(|e| e.response.name().to_lowercase() == wanted)
        })
    }

    /// Whether `name` is registered, ignoring case
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register an auto-response and load its flag from storage
    pub async fn register(&mut self, response: AutoResponse) -> Result<(), BotError> {
        if self.contains(response.name()) {
            return Err(ConstructionError::DuplicateName(response.name().to_string()).into());
        }

        tracing::info!("Registering auto-response: {}", response.name());
        let name = response.name().to_string();
        self.entries.push(Registered {
            response,
            enabled: AtomicBool::new(true),
        });
        self.is_enabled(&name).await?;
        Ok(())
    }

    /// Read a flag, writing the default `true` when it is missing.
    /// Callers hold `self.flags`.
    async fn read_flag(&self, name: &str) -> Result<bool, StorageError> {
        let key = self.key(name);
        let enabled = match self.store.load_blob(&key).await? {
            Some(Value::Bool(enabled)) => enabled,
            Some(other) => {
                tracing::warn!("Flag {} holds {}, resetting to enabled", key, other);
                self.store.store_blob(&key, Value::Bool(true)).await?;
                true
            }
            None => {
                self.store.store_blob(&key, Value::Bool(true)).await?;
                true
            }
        };

        if let Some(entry) = self.entry(name) {
            entry.enabled.store(enabled, Ordering::Relaxed);
        }
        Ok(enabled)
    }

    /// Whether `name` is enabled. Any name can be queried; the first query for
    /// an unseen name persists `true`.
    pub async fn is_enabled(&self, name: &str) -> Result<bool, BotError> {
        let _guard = self.flags.lock().await;
        Ok(self.read_flag(name).await?)
    }

    /// Make sure every registered auto-response has a persisted flag
    pub async fn sync_defaults(&self) -> Result<(), BotError> {
        let _guard = self.flags.lock().await;
        for entry in &self.entries {
            self.read_flag(entry.response.name()).await?;
        }
        Ok(())
    }

    /// Persist a new flag value for a registered auto-response, matched
    /// ignoring case
    pub async fn set_enabled(&self, name: &str, enabled: bool) -> Result<(), BotError> {
        let Some(entry) = self.find(name) else {
            return Err(BotError::NotFound(format!("auto-response '{}'", name)));
        };
        let name = entry.response.name();

        let _guard = self.flags.lock().await;
        for other in &self.entries {
            self.read_flag(other.response.name()).await?;
        }
        self.store.store_blob(&self.key(name), Value::Bool(enabled)).await?;
        entry.enabled.store(enabled, Ordering::Relaxed);

        tracing::info!("Auto-response {} {}", name, if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    /// Registered auto-responses with their cached flags, in registration order
    pub fn list(&self) -> Vec<AutoResponseInfo> {
        self.entries
            .iter()
            .map(|e| AutoResponseInfo {
                name: e.response.name().to_string(),
                description: e.response.description().to_string(),
                enabled: e.enabled.load(Ordering::Relaxed),
                allow_in_private: e.response.allow_in_private(),
            })
            .collect()
    }

    /// Reload every flag from storage, then list
    pub async fn refresh(&self) -> Result<Vec<AutoResponseInfo>, BotError> {
        self.sync_defaults().await?;
        Ok(self.list())
    }

    /// Offer a free-text message to every enabled auto-response, in
    /// registration order. A failing responder is logged and skipped. Returns
    /// the names of responders that reported acting.
    pub async fn dispatch_free_text(&self, message: &NormalizedMessage, channel: &dyn Channel) -> Vec<String> {
        let mut acted = Vec::new();

        for entry in &self.entries {
            let name = entry.response.name();

            match self.is_enabled(name).await {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::warn!("Skipping auto-response {}: {}", name, e);
                    continue;
                }
            }

            if message.is_private() && !entry.response.allow_in_private() {
                continue;
            }

            match entry.response.handler().respond(message, channel).await {
                Ok(true) => {
                    tracing::debug!("[{}] auto-response {} acted", message.chat_id(), name);
                    acted.push(name.to_string());
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(
                        auto_response = %name,
                        author = %message.author().id,
                        chat = %message.chat_id(),
                        error = %e,
                        "auto-response failed"
                    );
                }
            }
        }

        acted
    }
}
