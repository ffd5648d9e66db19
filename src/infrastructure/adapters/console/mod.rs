//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};

use crate::application::errors::BotError;
use crate::domain::entities::{Message, User};
use crate::domain::traits::{BotInfo, Channel};
use crate::infrastructure::config::ConsoleConfig;

/// Console adapter: one chat, one author, lines from stdin
pub struct ConsoleAdapter {
    info: BotInfo,
    chat_id: String,
    user: User,
    private: bool,
    inbox: Mutex<mpsc::Receiver<String>>,
}

impl ConsoleAdapter {
    /// Adapter fed by `lines`; the sender side decides where input comes from
    pub fn new(config: &ConsoleConfig, bot_name: &str, lines: mpsc::Receiver<String>) -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: bot_name.to_string(),
                username: "console".to_string(),
            },
            chat_id: config.chat_id.clone(),
            user: User::new(config.user_id.clone()).with_username(config.user_id.clone()),
            private: config.private,
            inbox: Mutex::new(lines),
        }
    }

    /// Adapter reading stdin on a background task
    pub fn from_stdin(config: &ConsoleConfig, bot_name: &str) -> Self {
        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if tx.send(line).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
        });
        Self::new(config, bot_name, rx)
    }

    fn to_message(&self, line: String) -> Message {
        let message = Message::new(self.chat_id.clone(), self.user.clone(), line);
        if self.private {
            message.private()
        } else {
            message
        }
    }

    /// Next input line as a message, skipping blank lines. `None` at end of input.
    pub async fn next_message(&self) -> Option<Message> {
        let mut inbox = self.inbox.lock().await;
        loop {
            let line = inbox.recv().await?;
            if !line.trim().is_empty() {
                return Some(self.to_message(line));
            }
        }
    }
}

#[async_trait]
impl Channel for ConsoleAdapter {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), BotError> {
        if chat_id == self.chat_id {
            println!("[BOT] {}", text);
        } else {
            println!("[BOT -> {}] {}", chat_id, text);
        }
        Ok(())
    }

    async fn await_message(&self, chat_id: &str, author: &User) -> Result<Option<Message>, BotError> {
        if chat_id != self.chat_id || !author.same_author(&self.user) {
            tracing::debug!("console has no messages for {} in {}", author.id, chat_id);
            return Ok(None);
        }
        let mut inbox = self.inbox.lock().await;
        Ok(inbox.recv().await.map(|line| self.to_message(line)))
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
