#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use parley_bot::application::commands::{builtin_commands, builtin_registry};
use parley_bot::application::errors::BotError;
use parley_bot::application::messaging::MessageDispatcher;
use parley_bot::application::services::DEFAULT_NAMESPACE;
use parley_bot::domain::entities::{Message, User};
use parley_bot::domain::traits::{BotInfo, Channel, Store};
use parley_bot::infrastructure::storage::MemoryStore;

pub const CHAT: &str = "chat-1";
pub const ADMIN: &str = "admin";
pub const PREFIX: &str = ":";

enum Scripted {
    Text(String),
    Silence,
}

/// Channel that answers dialog waits from a script and records everything sent
#[derive(Default)]
pub struct ScriptedChannel {
    replies: Mutex<VecDeque<Scripted>>,
    sent: Mutex<Vec<(String, String)>>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: &[&str]) -> Self {
        let channel = Self::new();
        for reply in replies {
            channel.reply(reply);
        }
        channel
    }

    pub fn reply(&self, text: &str) {
        self.replies.lock().unwrap().push_back(Scripted::Text(text.to_string()));
    }

    /// The next wait never resolves on its own
    pub fn silence(&self) {
        self.replies.lock().unwrap().push_back(Scripted::Silence);
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }

    pub fn count(&self, text: &str) -> usize {
        self.texts().iter().filter(|t| t.as_str() == text).count()
    }
}

#[async_trait]
impl Channel for ScriptedChannel {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), BotError> {
        self.sent.lock().unwrap().push((chat_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn await_message(&self, chat_id: &str, author: &User) -> Result<Option<Message>, BotError> {
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Text(text)) => Ok(Some(Message::new(chat_id, author.clone(), text))),
            Some(Scripted::Silence) => std::future::pending().await,
            None => Ok(None),
        }
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "bot".to_string(),
            name: "parley-bot".to_string(),
            username: "parley_bot".to_string(),
        }
    }
}

pub fn admin() -> User {
    User::new(ADMIN).with_username("admin")
}

pub fn stranger() -> User {
    User::new("stranger")
}

pub fn message_from(user: User, text: &str) -> Message {
    Message::new(CHAT, user, text)
}

pub fn message(text: &str) -> Message {
    message_from(admin(), text)
}

/// Route log output through the test harness; set RUST_LOG to see it
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Dispatcher over the built-in commands with `admin` as the only privileged user
pub async fn builtin_dispatcher(store: Arc<dyn Store>) -> MessageDispatcher {
    init_logging();
    let tree = builtin_commands().unwrap();
    let registry = builtin_registry(store.clone(), DEFAULT_NAMESPACE, PREFIX).await.unwrap();
    MessageDispatcher::new(PREFIX, Arc::new(tree), Arc::new(registry), store)
        .with_privilege_check(|user: &User| user.id == ADMIN)
}

pub fn memory_store() -> Arc<dyn Store> {
    Arc::new(MemoryStore::new())
}
