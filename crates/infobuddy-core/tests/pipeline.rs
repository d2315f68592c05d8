//! Response pipeline tests against a scripted backend.

mod common;

use common::{ScriptedAssistant, test_remote_config};
use infobuddy_core::{ChatManager, CoreError, SessionContext};
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// Completed run: the transcript ends up with exactly the user prompt and
/// the assistant reply.
#[tokio::test(start_paused = true)]
async fn completed_run_yields_a_two_entry_transcript() {
    let service = Arc::new(ScriptedAssistant::completing("The pass rate is 92%."));
    let manager = ChatManager::new(service.clone(), &test_remote_config());
    let mut session = SessionContext::new();
    manager.start_new_chat(&mut session).await.expect("create");

    let prompt = "What is the pass rate?";
    session.push_user_message(prompt);
    let reply = manager
        .process_assistant_response(&session, prompt)
        .await
        .expect("turn");
    session.push_assistant_message(reply.clone());

    assert_eq!(reply, "The pass rate is 92%.");
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[0].content, "What is the pass rate?");
    assert_eq!(session.messages[1].content, "The pass rate is 92%.");

    // The prompt reached the remote thread exactly once.
    let appended = service.appended.lock().expect("appended");
    assert_eq!(appended.len(), 1);
    assert_eq!(appended[0].1, "What is the pass rate?");
}

/// Failed run: an error comes back and no assistant entry is appended.
#[tokio::test(start_paused = true)]
async fn failed_run_leaves_only_the_user_message() {
    let service = Arc::new(ScriptedAssistant::failing());
    let manager = ChatManager::new(service, &test_remote_config());
    let mut session = SessionContext::new();
    manager.start_new_chat(&mut session).await.expect("create");

    session.push_user_message("anything");
    let err = manager
        .process_assistant_response(&session, "anything")
        .await
        .expect_err("run should fail");

    assert!(matches!(err, CoreError::RunFailed { status: "failed" }));
    assert_eq!(session.messages.len(), 1);
    assert_eq!(session.messages[0].content, "anything");
}

/// A run stuck in-progress hits the configured deadline instead of
/// stalling forever.
#[tokio::test(start_paused = true)]
async fn stuck_run_times_out_at_the_deadline() {
    let service = Arc::new(ScriptedAssistant::never_finishing());
    let manager = ChatManager::new(service, &test_remote_config());
    let mut session = SessionContext::new();
    manager.start_new_chat(&mut session).await.expect("create");

    let err = manager
        .process_assistant_response(&session, "hello")
        .await
        .expect_err("should time out");
    assert!(matches!(err, CoreError::RunTimedOut(_)));
}

/// Submitting without an active thread is rejected before any remote call.
#[tokio::test]
async fn turn_without_a_thread_is_rejected() {
    let service = Arc::new(ScriptedAssistant::completing("unused"));
    let manager = ChatManager::new(service.clone(), &test_remote_config());
    let session = SessionContext::new();

    let err = manager
        .process_assistant_response(&session, "hello")
        .await
        .expect_err("no thread");
    assert!(matches!(err, CoreError::NoActiveThread));
    assert!(service.appended.lock().expect("appended").is_empty());
}
