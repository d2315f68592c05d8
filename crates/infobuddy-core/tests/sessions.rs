//! Session history and chat lifecycle tests.

mod common;

use common::{ScriptedAssistant, test_remote_config};
use infobuddy_core::{ChatManager, SessionContext};
use infobuddy_remote::ThreadId;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn manager(service: Arc<ScriptedAssistant>) -> ChatManager {
    ChatManager::new(service, &test_remote_config())
}

/// Fresh session plus N creations yields aliases "Chat 1".."Chat N" over
/// distinct thread ids.
#[tokio::test]
async fn aliases_count_up_from_a_fresh_session() {
    let manager = manager(Arc::new(ScriptedAssistant::completing("ok")));
    let mut session = SessionContext::new();

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(manager.start_new_chat(&mut session).await.expect("create"));
    }

    let aliases: Vec<&str> = session.chats().iter().map(|c| c.alias.as_str()).collect();
    assert_eq!(aliases, vec!["Chat 1", "Chat 2", "Chat 3"]);
    for id in &ids {
        assert!(session.chat(id).is_some());
    }
    ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    ids.dedup();
    assert_eq!(ids.len(), 3);
    assert_eq!(session.thread_id, Some(ThreadId::from("thread-3")));
}

#[tokio::test]
async fn new_chat_resets_the_visible_transcript() {
    let manager = manager(Arc::new(ScriptedAssistant::completing("ok")));
    let mut session = SessionContext::new();
    manager.start_new_chat(&mut session).await.expect("create");
    session.push_user_message("hello");
    session.push_assistant_message("hi there");
    assert_eq!(session.messages.len(), 2);

    manager.start_new_chat(&mut session).await.expect("create");
    assert!(session.messages.is_empty());
    // The first chat keeps its mirror.
    let first = session.chat(&ThreadId::from("thread-1")).expect("chat 1");
    assert_eq!(first.messages.len(), 2);
}

#[tokio::test]
async fn selecting_a_chat_restores_its_messages() {
    let manager = manager(Arc::new(ScriptedAssistant::completing("ok")));
    let mut session = SessionContext::new();
    manager.start_new_chat(&mut session).await.expect("create");
    session.push_user_message("first chat question");
    manager.start_new_chat(&mut session).await.expect("create");

    let first = ThreadId::from("thread-1");
    assert!(session.select_chat(&first));
    assert_eq!(session.current_chat, Some(first.clone()));
    assert_eq!(session.thread_id, Some(first));
    assert_eq!(session.messages.len(), 1);
    assert_eq!(session.messages[0].content, "first chat question");

    assert!(!session.select_chat(&ThreadId::from("thread-99")));
}

/// A reply that finishes after the user has moved on to another chat lands
/// in the chat that produced it, never the newly active one.
#[tokio::test]
async fn late_reply_lands_in_the_chat_that_produced_it() {
    let manager = manager(Arc::new(ScriptedAssistant::completing("The pass rate is 92%.")));
    let mut session = SessionContext::new();
    let first = manager.start_new_chat(&mut session).await.expect("create");
    session.push_user_message("What is the pass rate?");
    let reply = manager
        .run_turn(&first, "What is the pass rate?")
        .await
        .expect("turn");

    // A second chat becomes active before the reply is delivered.
    let second = manager.start_new_chat(&mut session).await.expect("create");
    assert!(session.push_assistant_message_for(&first, reply));

    let first_chat = session.chat(&first).expect("first chat");
    assert_eq!(first_chat.messages.len(), 2);
    assert_eq!(first_chat.messages[0].content, "What is the pass rate?");
    assert_eq!(first_chat.messages[1].content, "The pass rate is 92%.");
    // The active chat and the visible transcript stay empty.
    assert!(session.chat(&second).expect("second chat").messages.is_empty());
    assert!(session.messages.is_empty());
}

/// Delivering into the still-active chat updates the visible transcript;
/// delivering into a deleted chat reports failure and changes nothing.
#[tokio::test]
async fn reply_delivery_tracks_the_active_and_deleted_chats() {
    let manager = manager(Arc::new(ScriptedAssistant::completing("ok")));
    let mut session = SessionContext::new();
    let active = manager.start_new_chat(&mut session).await.expect("create");
    session.push_user_message("hello");

    assert!(session.push_assistant_message_for(&active, "hi there"));
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[1].content, "hi there");

    assert!(!session.push_assistant_message_for(&ThreadId::from("thread-99"), "dropped"));
    assert_eq!(session.messages.len(), 2);
}

/// Deleting the active chat auto-starts a replacement thread; the deleted
/// id disappears from history and the new current chat is empty.
#[tokio::test]
async fn deleting_the_active_chat_starts_a_replacement() {
    let manager = manager(Arc::new(ScriptedAssistant::completing("ok")));
    let mut session = SessionContext::new();
    manager.start_new_chat(&mut session).await.expect("create");
    session.push_user_message("doomed");
    let deleted = session.thread_id.clone().expect("active thread");

    let replacement = manager
        .delete_current_chat(&mut session)
        .await
        .expect("delete")
        .expect("replacement started");

    assert!(session.chat(&deleted).is_none());
    assert_ne!(replacement, deleted);
    assert_eq!(session.current_chat, Some(replacement.clone()));
    assert_eq!(session.thread_id, Some(replacement.clone()));
    assert!(session.messages.is_empty());
    let entry = session.chat(&replacement).expect("replacement entry");
    assert!(entry.messages.is_empty());
}

#[tokio::test]
async fn deleting_an_inactive_chat_keeps_the_active_thread() {
    let manager = manager(Arc::new(ScriptedAssistant::completing("ok")));
    let mut session = SessionContext::new();
    manager.start_new_chat(&mut session).await.expect("create");
    manager.start_new_chat(&mut session).await.expect("create");
    let active = session.thread_id.clone().expect("active");

    // Select the first chat, switch back, then delete the first.
    let first = ThreadId::from("thread-1");
    session.current_chat = Some(first.clone());
    let was_active_before = session.thread_id.clone();
    assert_eq!(was_active_before, Some(active.clone()));

    let replacement = manager
        .delete_current_chat(&mut session)
        .await
        .expect("delete");
    assert!(replacement.is_none());
    assert!(session.chat(&first).is_none());
    assert_eq!(session.thread_id, Some(active.clone()));
    assert_eq!(session.current_chat, Some(active));
}
