use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::NormalizedMessage;
use crate::application::errors::{BotError, ConstructionError};
use crate::domain::traits::Channel;

/// A handler evaluated against every non-command message.
#[async_trait]
pub trait AutoResponder: Send + Sync {
    /// Returns whether the responder decided to act on the message
    async fn respond(&self, message: &NormalizedMessage, channel: &dyn Channel) -> Result<bool, BotError>;

    /// Fallback description used when the registration does not give one
    fn description(&self) -> Option<&str> {
        None
    }
}

/// Registration entry for an auto-response
#[derive(Clone)]
pub struct AutoResponse {
    name: String,
    description: String,
    handler: Arc<dyn AutoResponder>,
    allow_in_private: bool,
}

impl AutoResponse {
    pub fn builder<R: AutoResponder + 'static>(name: impl Into<String>, handler: R) -> AutoResponseBuilder {
        AutoResponseBuilder {
            name: name.into(),
            description: None,
            handler: Arc::new(handler),
            allow_in_private: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn handler(&self) -> &Arc<dyn AutoResponder> {
        &self.handler
    }

    pub fn allow_in_private(&self) -> bool {
        self.allow_in_private
    }
}

impl fmt::Debug for AutoResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoResponse")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("allow_in_private", &self.allow_in_private)
            .finish()
    }
}

pub struct AutoResponseBuilder {
    name: String,
    description: Option<String>,
    handler: Arc<dyn AutoResponder>,
    allow_in_private: bool,
}

impl AutoResponseBuilder {
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Never trigger in private chats
    pub fn no_private(mut self) -> Self {
        self.allow_in_private = false;
        self
    }

    pub fn build(self) -> Result<AutoResponse, ConstructionError> {
        // Names are typed as a single chat token
        if self.name.is_empty() || self.name.chars().any(char::is_whitespace) {
            return Err(ConstructionError::InvalidName(self.name));
        }

        let description = self
            .description
            .or_else(|| self.handler.description().map(str::to_string))
            .map(|d| d.replace('\n', " "))
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| ConstructionError::MissingDescription(self.name.clone()))?;

        Ok(AutoResponse {
            name: self.name,
            description,
            handler: self.handler,
            allow_in_private: self.allow_in_private,
        })
    }
}
