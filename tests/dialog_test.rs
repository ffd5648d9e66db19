mod common;

use serde_json::json;
use std::time::Duration;

use common::*;
use parley_bot::application::commands::say::{relay, EMPTY_NOTICE};
use parley_bot::application::commands::settings::{
    edit_setting, CONFIRM_PROMPT, DECLINED_NOTICE, INVALID_JSON_NOTICE, UPDATED_NOTICE, UPDATED_WARNING,
};
use parley_bot::application::messaging::dialog::{CANCEL_NOTICE, CONFIRM_RETRY_NOTICE, TIMEOUT_NOTICE};
use parley_bot::application::messaging::{Dialog, DialogStage, DialogTimeouts};
use parley_bot::domain::traits::Store;
use parley_bot::infrastructure::storage::MemoryStore;

async fn store_with_motd() -> MemoryStore {
    let store = MemoryStore::new();
    store.save_document("motd", &json!({"motd": "hello"})).await.unwrap();
    store
}

#[tokio::test]
async fn declining_leaves_the_setting_alone() {
    let store = store_with_motd().await;
    let channel = ScriptedChannel::with_replies(&["n"]);
    let mut dialog = Dialog::new(&channel, CHAT, admin());

    let stage = edit_setting(&store, &mut dialog, "motd", DialogTimeouts::default()).await.unwrap();

    assert_eq!(stage, DialogStage::Cancelled);
    assert_eq!(
        channel.texts(),
        vec![
            "motd".to_string(),
            "{\n  \"motd\": \"hello\"\n}".to_string(),
            CONFIRM_PROMPT.to_string(),
            DECLINED_NOTICE.to_string(),
        ]
    );
    assert_eq!(store.load_document("motd").await.unwrap(), Some(json!({"motd": "hello"})));
}

#[tokio::test]
async fn invalid_json_is_retried_until_valid() {
    let store = store_with_motd().await;
    let channel = ScriptedChannel::with_replies(&["Yes", "{oops", "not json", r#"{"motd": "bye"}"#]);
    let mut dialog = Dialog::new(&channel, CHAT, admin());

    let stage = edit_setting(&store, &mut dialog, "motd", DialogTimeouts::default()).await.unwrap();

    assert_eq!(stage, DialogStage::Applied);
    assert_eq!(dialog.stage(), DialogStage::Applied);
    assert_eq!(channel.count(INVALID_JSON_NOTICE), 2);
    let texts = channel.texts();
    assert_eq!(texts[texts.len() - 2], UPDATED_NOTICE);
    assert_eq!(texts[texts.len() - 1], UPDATED_WARNING);
    assert_eq!(store.load_document("motd").await.unwrap(), Some(json!({"motd": "bye"})));
}

#[tokio::test]
async fn unclear_confirmation_asks_again() {
    let store = store_with_motd().await;
    let channel = ScriptedChannel::with_replies(&["maybe", "y", "[1, 2]"]);
    let mut dialog = Dialog::new(&channel, CHAT, admin());

    let stage = edit_setting(&store, &mut dialog, "motd", DialogTimeouts::default()).await.unwrap();

    assert_eq!(stage, DialogStage::Applied);
    assert_eq!(channel.count(CONFIRM_RETRY_NOTICE), 1);
    assert_eq!(store.load_document("motd").await.unwrap(), Some(json!([1, 2])));
}

#[tokio::test(start_paused = true)]
async fn silence_while_collecting_times_out() {
    let store = store_with_motd().await;
    let channel = ScriptedChannel::with_replies(&["y"]);
    channel.silence();
    let mut dialog = Dialog::new(&channel, CHAT, admin());
    let started = tokio::time::Instant::now();

    let stage = edit_setting(&store, &mut dialog, "motd", DialogTimeouts::default()).await.unwrap();

    assert_eq!(stage, DialogStage::TimedOut);
    assert!(started.elapsed() >= Duration::from_secs(120));
    assert_eq!(channel.texts().last().map(String::as_str), Some(TIMEOUT_NOTICE));
    assert_eq!(store.load_document("motd").await.unwrap(), Some(json!({"motd": "hello"})));
}

#[tokio::test(start_paused = true)]
async fn silence_while_confirming_uses_the_shorter_timeout() {
    let store = store_with_motd().await;
    let channel = ScriptedChannel::new();
    channel.silence();
    let mut dialog = Dialog::new(&channel, CHAT, admin());
    let started = tokio::time::Instant::now();

    let stage = edit_setting(&store, &mut dialog, "motd", DialogTimeouts::default()).await.unwrap();

    assert_eq!(stage, DialogStage::TimedOut);
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(40) && waited < Duration::from_secs(120));
    assert_eq!(channel.count(TIMEOUT_NOTICE), 1);
}

#[tokio::test]
async fn exit_cancels_collection() {
    let store = store_with_motd().await;
    let channel = ScriptedChannel::with_replies(&["y", "EXIT"]);
    let mut dialog = Dialog::new(&channel, CHAT, admin());

    let stage = edit_setting(&store, &mut dialog, "motd", DialogTimeouts::default()).await.unwrap();

    assert_eq!(stage, DialogStage::Cancelled);
    assert_eq!(channel.texts().last().map(String::as_str), Some(CANCEL_NOTICE));
    assert_eq!(store.load_document("motd").await.unwrap(), Some(json!({"motd": "hello"})));
}

#[tokio::test]
async fn closed_stream_cancels_the_dialog() {
    let store = store_with_motd().await;
    let channel = ScriptedChannel::new();
    let mut dialog = Dialog::new(&channel, CHAT, admin());

    let stage = edit_setting(&store, &mut dialog, "motd", DialogTimeouts::default()).await.unwrap();

    assert_eq!(stage, DialogStage::Cancelled);
}

#[tokio::test]
async fn settings_commands_through_the_dispatcher() {
    let store = memory_store();
    store.save_document("motd", &json!({"motd": "hello"})).await.unwrap();
    let dispatcher = builtin_dispatcher(store.clone()).await;
    let channel = ScriptedChannel::with_replies(&["y", r#"{"motd": "hi"}"#]);

    dispatcher.process(message(":settings list"), &channel).await;
    dispatcher.process(message(":settings edit nope"), &channel).await;
    dispatcher.process(message(":settings edit ../etc"), &channel).await;
    dispatcher.process(message(":settings edit motd"), &channel).await;

    let texts = channel.texts();
    assert_eq!(texts[0], "-- 'motd'");
    assert_eq!(texts[1], "No setting called 'nope' found. Please use ':settings list'.");
    assert_eq!(texts[2], "No setting called '../etc' found. Please use ':settings list'.");
    assert_eq!(texts.last().map(String::as_str), Some(UPDATED_WARNING));
    assert_eq!(store.load_document("motd").await.unwrap(), Some(json!({"motd": "hi"})));
}

#[tokio::test]
async fn strangers_cannot_edit_settings() {
    let store = memory_store();
    store.save_document("motd", &json!({"motd": "hello"})).await.unwrap();
    let dispatcher = builtin_dispatcher(store).await;
    let channel = ScriptedChannel::with_replies(&["y"]);

    dispatcher.process(message_from(stranger(), ":settings edit motd"), &channel).await;

    assert_eq!(
        channel.texts(),
        vec!["Sorry, you don't have permission to use \":settings edit\"."]
    );
}

#[tokio::test]
async fn say_relays_into_another_chat() {
    let dispatcher = builtin_dispatcher(memory_store()).await;
    let channel = ScriptedChannel::with_replies(&["y", "Hello, Everyone"]);

    dispatcher.process(message(":say Other-Chat"), &channel).await;

    let sent = channel.sent();
    assert!(sent.contains(&("Other-Chat".to_string(), "Hello, Everyone".to_string())));
    assert_eq!(sent.last(), Some(&(CHAT.to_string(), "Message relayed.".to_string())));
}

#[tokio::test]
async fn relay_rejects_empty_text_and_defaults_to_this_chat() {
    let channel = ScriptedChannel::with_replies(&["y", "   ", "hi"]);
    let mut dialog = Dialog::new(&channel, CHAT, admin());

    let stage = relay(&mut dialog, CHAT, DialogTimeouts::default()).await.unwrap();

    assert_eq!(stage, DialogStage::Applied);
    assert_eq!(channel.count(EMPTY_NOTICE), 1);
    assert_eq!(channel.sent().last(), Some(&(CHAT.to_string(), "hi".to_string())));
}

#[tokio::test]
async fn settings_edit_keeps_the_name_as_typed() {
    let store = memory_store();
    store.save_document("BotConfig", &json!({"motd": "hello"})).await.unwrap();
    let dispatcher = builtin_dispatcher(store.clone()).await;
    let channel = ScriptedChannel::with_replies(&["y", r#"{"motd": "changed"}"#]);

    dispatcher.process(message(":settings list"), &channel).await;
    dispatcher.process(message(":settings edit BotConfig"), &channel).await;

    let texts = channel.texts();
    assert_eq!(texts[0], "-- 'BotConfig'");
    assert_eq!(texts[1], "BotConfig");
    assert_eq!(texts.last().map(String::as_str), Some(UPDATED_WARNING));
    assert_eq!(store.load_document("BotConfig").await.unwrap(), Some(json!({"motd": "changed"})));
}

#[tokio::test]
async fn say_target_survives_extra_spaces() {
    let dispatcher = builtin_dispatcher(memory_store()).await;
    let channel = ScriptedChannel::with_replies(&["y", "hello"]);

    dispatcher.process(message(":say  Other-Chat"), &channel).await;

    let sent = channel.sent();
    assert_eq!(sent[0].1, "Relay your next message to Other-Chat? [Y/N]");
    assert!(sent.contains(&("Other-Chat".to_string(), "hello".to_string())));
    assert!(!sent.contains(&(CHAT.to_string(), "hello".to_string())));
}
