//! Feedback persistence tests.

mod common;

use common::{ScriptedAssistant, test_remote_config};
use infobuddy_core::{
    ChatManager, Feedback, FeedbackKind, FeedbackRecord, FeedbackStore, SessionContext,
};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::Arc;
use tempfile::tempdir;

async fn session_with_chat() -> SessionContext {
    let manager = ChatManager::new(
        Arc::new(ScriptedAssistant::completing("ok")),
        &test_remote_config(),
    );
    let mut session = SessionContext::new();
    manager.start_new_chat(&mut session).await.expect("create");
    session
}

/// Thumbs-down with text: the monthly file gains one record matching the
/// active chat's id and alias.
#[tokio::test]
async fn thumbs_down_with_text_is_recorded() {
    let temp = tempdir().expect("tempdir");
    let store = FeedbackStore::new(temp.path().join("feedback"));
    let session = session_with_chat().await;

    let file = store
        .save_for_session(
            &session,
            "What is the pass rate?",
            "It is high.",
            Feedback {
                kind: FeedbackKind::ThumbsDown,
                text: Some("too vague".to_string()),
            },
        )
        .expect("save");

    let records: Vec<FeedbackRecord> =
        serde_json::from_str(&std::fs::read_to_string(&file).expect("read")).expect("parse");
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.thread_id.as_str(), "thread-1");
    assert_eq!(record.chat_alias, "Chat 1");
    assert_eq!(record.user_message, "What is the pass rate?");
    assert_eq!(record.assistant_response, "It is high.");
    assert_eq!(record.feedback.kind, FeedbackKind::ThumbsDown);
    assert_eq!(record.feedback.text.as_deref(), Some("too vague"));
}

/// A rating submitted after switching chats still names the chat the
/// judged exchange ran on.
#[tokio::test]
async fn feedback_names_the_chat_that_produced_the_reply() {
    let temp = tempdir().expect("tempdir");
    let store = FeedbackStore::new(temp.path());
    let manager = ChatManager::new(
        Arc::new(ScriptedAssistant::completing("ok")),
        &test_remote_config(),
    );
    let mut session = SessionContext::new();
    let first = manager.start_new_chat(&mut session).await.expect("create");
    manager.start_new_chat(&mut session).await.expect("create");

    let file = store
        .save_for_thread(
            &session,
            first,
            "q",
            "a",
            Feedback {
                kind: FeedbackKind::ThumbsUp,
                text: None,
            },
        )
        .expect("save");

    let records: Vec<FeedbackRecord> =
        serde_json::from_str(&std::fs::read_to_string(&file).expect("read")).expect("parse");
    assert_eq!(records[0].thread_id.as_str(), "thread-1");
    assert_eq!(records[0].chat_alias, "Chat 1");
}

/// Every saved file deserializes as a JSON array of objects carrying the
/// required fields, and appending never drops prior records.
#[tokio::test]
async fn appending_preserves_prior_records() {
    let temp = tempdir().expect("tempdir");
    let store = FeedbackStore::new(temp.path());
    let session = session_with_chat().await;

    for i in 0..3 {
        store
            .save_for_session(
                &session,
                format!("question {i}"),
                "answer",
                Feedback {
                    kind: FeedbackKind::ThumbsUp,
                    text: None,
                },
            )
            .expect("save");
    }

    let contents = std::fs::read_to_string(store.current_file()).expect("read");
    let parsed: Value = serde_json::from_str(&contents).expect("parse");
    let array = parsed.as_array().expect("array");
    assert_eq!(array.len(), 3);
    for entry in array {
        let object = entry.as_object().expect("object");
        for field in ["timestamp", "thread_id", "chat_alias", "feedback"] {
            assert!(object.contains_key(field), "missing {field}");
        }
    }
    assert_eq!(array[0]["user_message"], "question 0");
    assert_eq!(array[2]["user_message"], "question 2");
    // thumbs rating serializes with its wire spelling
    assert_eq!(array[0]["feedback"]["type"], "thumbs-up");
    // optional text is omitted, not null
    assert!(array[0]["feedback"].get("text").is_none());
}

/// An unparseable feedback file is set aside, not silently discarded.
#[tokio::test]
async fn corrupt_file_is_preserved_aside() {
    let temp = tempdir().expect("tempdir");
    let store = FeedbackStore::new(temp.path());
    let session = session_with_chat().await;
    std::fs::write(store.current_file(), "not json at all").expect("seed corrupt");

    store
        .save_for_session(
            &session,
            "q",
            "a",
            Feedback {
                kind: FeedbackKind::ThumbsUp,
                text: None,
            },
        )
        .expect("save");

    let records: Vec<FeedbackRecord> =
        serde_json::from_str(&std::fs::read_to_string(store.current_file()).expect("read"))
            .expect("parse");
    assert_eq!(records.len(), 1);

    let aside: Vec<_> = std::fs::read_dir(temp.path())
        .expect("read_dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .contains(".corrupt-")
        })
        .collect();
    assert_eq!(aside.len(), 1);
    let preserved = std::fs::read_to_string(aside[0].path()).expect("read aside");
    assert_eq!(preserved, "not json at all");
}

/// Non-ASCII feedback text survives the round trip unescaped.
#[tokio::test]
async fn non_ascii_text_is_preserved() {
    let temp = tempdir().expect("tempdir");
    let store = FeedbackStore::new(temp.path());
    let session = session_with_chat().await;

    store
        .save_for_session(
            &session,
            "護理學士課程是什麼？",
            "回答",
            Feedback {
                kind: FeedbackKind::ThumbsUp,
                text: Some("很好 👍".to_string()),
            },
        )
        .expect("save");

    let contents = std::fs::read_to_string(store.current_file()).expect("read");
    assert!(contents.contains("護理學士課程是什麼？"));
    assert!(contents.contains("很好 👍"));
}
