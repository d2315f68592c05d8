//! TUI event types for input and turn outcomes.

use crossterm::event::KeyEvent;
use infobuddy_remote::ThreadId;

/// Application event emitted by input handlers or the turn task.
#[derive(Debug)]
pub enum AppEvent {
    /// Keyboard input event.
    Input(KeyEvent),
    /// Periodic tick event (spinner animation).
    Tick,
    /// Scroll event in the chat view.
    Scroll(i16),
    /// The spawned assistant turn finished with a reply. Carries the thread
    /// that produced it so late replies land in the right chat.
    TurnCompleted {
        thread_id: ThreadId,
        prompt: String,
        reply: String,
    },
    /// The spawned assistant turn failed.
    TurnFailed {
        thread_id: ThreadId,
        message: String,
    },
}
