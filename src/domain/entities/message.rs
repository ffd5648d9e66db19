use super::User;
use chrono::{DateTime, Utc};

/// Represents an incoming or outgoing chat message, as delivered by the transport
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub sender: User,
    pub text: String,
    pub is_private: bool,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(chat_id: impl Into<String>, sender: User, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            sender,
            text: text.into(),
            is_private: false,
            timestamp: Utc::now(),
        }
    }

    pub fn private(mut self) -> Self {
        self.is_private = true;
        self
    }
}

/// A message after prefix detection and tokenization.
///
/// `tokens` is never empty: blank content yields a single empty token.
#[derive(Debug, Clone)]
pub struct NormalizedMessage {
    raw: Message,
    is_command: bool,
    tokens: Vec<String>,
    raw_tokens: Vec<String>,
}

impl NormalizedMessage {
    pub(crate) fn new(raw: Message, is_command: bool, tokens: Vec<String>, raw_tokens: Vec<String>) -> Self {
        debug_assert!(!tokens.is_empty());
        debug_assert_eq!(tokens.len(), raw_tokens.len());
        Self {
            raw,
            is_command,
            tokens,
            raw_tokens,
        }
    }

    pub fn raw(&self) -> &Message {
        &self.raw
    }

    pub fn is_command(&self) -> bool {
        self.is_command
    }

    /// Lower-cased tokens
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Same tokens with their original casing
    pub fn raw_tokens(&self) -> &[String] {
        &self.raw_tokens
    }

    pub fn first_token(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or("")
    }

    pub fn author(&self) -> &User {
        &self.raw.sender
    }

    pub fn chat_id(&self) -> &str {
        &self.raw.chat_id
    }

    pub fn is_private(&self) -> bool {
        self.raw.is_private
    }

    /// Non-empty tokens from `start` on, joined by single spaces.
    pub fn args_from(&self, start: usize) -> Option<String> {
        join_args(&self.tokens, start)
    }

    /// Like `args_from`, keeping the original casing
    pub fn raw_args_from(&self, start: usize) -> Option<String> {
        join_args(&self.raw_tokens, start)
    }

    /// First non-empty original-case token at or after `start`
    pub fn raw_arg(&self, start: usize) -> Option<&str> {
        self.raw_tokens
            .get(start..)?
            .iter()
            .map(String::as_str)
            .find(|t| !t.is_empty())
    }
}

fn join_args(tokens: &[String], start: usize) -> Option<String> {
    let rest: Vec<&str> = tokens
        .get(start..)?
        .iter()
        .map(String::as_str)
        .filter(|t| !t.is_empty())
        .collect();
    if rest.is_empty() {
        return None;
    }
    Some(rest.join(" "))
}
