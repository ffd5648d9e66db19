//! Message parser - Normalizes raw messages into tokenized messages

use crate::domain::entities::{Message, NormalizedMessage};

/// Detects the command prefix and tokenizes message content
#[derive(Debug, Clone)]
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.command_prefix
    }

    /// Normalize an incoming message.
    ///
    /// The prefix match is case-sensitive and removes the prefix once. The
    /// rest is lower-cased, stripped of surrounding spaces and split on single
    /// spaces, so blank content yields `[""]`.
    pub fn normalize(&self, message: Message) -> NormalizedMessage {
        let (is_command, content) = match message.text.strip_prefix(self.command_prefix.as_str()) {
            Some(rest) if !self.command_prefix.is_empty() => (true, rest),
            _ => (false, message.text.as_str()),
        };

        let raw_tokens: Vec<String> = content.trim_matches(' ').split(' ').map(str::to_string).collect();
        let tokens = raw_tokens.iter().map(|t| t.to_lowercase()).collect();

        NormalizedMessage::new(message, is_command, tokens, raw_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::User;

    fn parse(prefix: &str, text: &str) -> NormalizedMessage {
        MessageParser::new(prefix).normalize(Message::new("chat", User::new("u1"), text))
    }

    #[test]
    fn strips_prefix_and_lowercases() {
        let msg = parse(":", ":Options Enable Ping");
        assert!(msg.is_command());
        assert_eq!(msg.tokens(), ["options", "enable", "ping"]);
        assert_eq!(msg.raw_tokens(), ["Options", "Enable", "Ping"]);
    }

    #[test]
    fn free_text_is_tokenized_too() {
        let msg = parse(":", "Hello World");
        assert!(!msg.is_command());
        assert_eq!(msg.tokens(), ["hello", "world"]);
        assert_eq!(msg.raw().text, "Hello World");
    }

    #[test]
    fn blank_content_yields_single_empty_token() {
        for text in [":", "", ":   ", "  "] {
            let msg = parse(":", text);
            assert_eq!(msg.tokens(), [""], "input {:?}", text);
        }
        assert!(parse(":", ":").is_command());
        assert!(!parse(":", "").is_command());
    }

    #[test]
    fn surrounding_spaces_are_trimmed_but_inner_runs_kept() {
        let msg = parse(":", ": help  options ");
        assert_eq!(msg.tokens(), ["help", "", "options"]);
    }

    #[test]
    fn prefix_must_lead_and_match_case() {
        assert!(!parse(":", "x:help").is_command());
        assert!(!parse("!Bot", "!bot help").is_command());
        let msg = parse("!Bot", "!Bot help");
        assert!(msg.is_command());
        assert_eq!(msg.tokens(), ["help"]);
    }

    #[test]
    fn prefix_is_removed_once() {
        let msg = parse(":", "::say");
        assert_eq!(msg.tokens(), [":say"]);
    }

    #[test]
    fn empty_prefix_never_marks_commands() {
        assert!(!parse("", "help").is_command());
    }
}
