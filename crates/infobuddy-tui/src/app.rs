//! Application state for the infobuddy TUI.

use infobuddy_core::{CredentialGate, FeedbackKind, Role, SessionContext};
use infobuddy_remote::ThreadId;
use log::{debug, info};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::cmp::min;

/// Spinner frames for the thinking indicator.
const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Which screen is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Credential gate; blocks everything else.
    Login,
    /// The chat surface.
    Chat,
}

/// Focused field on the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

/// Focused pane on the chat screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Prompt input box.
    Input,
    /// Chat history sidebar.
    Sidebar,
}

/// Chat roles displayed in the UI.
#[derive(Debug, Clone)]
pub enum ChatRole {
    /// User message.
    User,
    /// Assistant message.
    Assistant,
    /// Inline notice (errors, confirmations).
    Notice,
}

/// Single chat entry rendered in the transcript.
#[derive(Debug, Clone)]
pub struct ChatEntry {
    /// Role that produced the message.
    pub role: ChatRole,
    /// Message content.
    pub content: String,
}

/// Stage of the feedback widget shown after an assistant reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackStage {
    /// Waiting for a thumbs rating.
    Rate,
    /// Rating chosen; collecting the optional explanation.
    Explain,
}

/// Feedback being collected for the most recent exchange.
#[derive(Debug, Clone)]
pub struct PendingFeedback {
    /// Thread the judged exchange ran on.
    pub thread_id: ThreadId,
    /// The judged user prompt.
    pub user_message: String,
    /// The judged assistant reply.
    pub assistant_response: String,
    /// Chosen rating, once past the rate stage.
    pub kind: Option<FeedbackKind>,
    /// Explanation text typed so far.
    pub text: String,
    /// Current widget stage.
    pub stage: FeedbackStage,
}

/// Top-level application state for the TUI.
pub struct App {
    /// Active screen.
    pub screen: Screen,
    /// Credential gate over the configured user table.
    pub gate: CredentialGate,
    /// Login form: username field contents.
    pub username_input: String,
    /// Login form: password field contents.
    pub password_input: String,
    /// Login form: focused field.
    pub login_field: LoginField,
    /// Login form: error line, if the last submission failed.
    pub login_error: Option<String>,

    /// Per-session chat state.
    pub session: SessionContext,
    /// Transcript entries as rendered (session messages plus notices).
    pub messages: Vec<ChatEntry>,
    /// Current prompt input buffer.
    pub input: String,
    /// Focused pane.
    pub focus: Focus,
    /// Index of the highlighted chat in the sidebar.
    pub selected_chat: usize,
    /// Status line text.
    pub status: String,
    /// Whether an assistant turn is in flight.
    pub thinking: bool,
    /// Spinner animation frame.
    spinner_frame: usize,
    /// Feedback widget state for the latest reply, if shown.
    pub pending_feedback: Option<PendingFeedback>,

    /// Header title.
    pub title: String,
    /// Header tagline.
    pub tagline: String,
    /// Sidebar banner text, when the logo file loaded.
    pub logo: Option<String>,

    /// Current scroll offset.
    pub scroll: u16,
    /// Whether to auto-scroll to the bottom.
    pub auto_scroll: bool,
    /// Maximum scroll offset for the chat view.
    pub chat_max_scroll: u16,
}

impl App {
    /// Create application state starting at the login screen.
    pub fn new(gate: CredentialGate, title: String, tagline: String, logo: Option<String>) -> Self {
        Self {
            screen: Screen::Login,
            gate,
            username_input: String::new(),
            password_input: String::new(),
            login_field: LoginField::Username,
            login_error: None,
            session: SessionContext::new(),
            messages: Vec::new(),
            input: String::new(),
            focus: Focus::Input,
            selected_chat: 0,
            status: "idle".to_string(),
            thinking: false,
            spinner_frame: 0,
            pending_feedback: None,
            title,
            tagline,
            logo,
            scroll: 0,
            auto_scroll: true,
            chat_max_scroll: 0,
        }
    }

    /// Submit the login form. Clears both fields regardless of outcome and
    /// switches to the chat screen on success.
    pub fn submit_login(&mut self) -> bool {
        let username = std::mem::take(&mut self.username_input);
        let password = std::mem::take(&mut self.password_input);
        let accepted = self.gate.check_password(&username, &password);
        if accepted {
            info!("login successful, entering chat screen");
            self.login_error = None;
            self.screen = Screen::Chat;
        } else {
            self.login_error = Some(infobuddy_core::LOGIN_FAILED_MESSAGE.to_string());
            self.login_field = LoginField::Username;
        }
        accepted
    }

    /// Set the status line.
    pub fn push_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Append the user's prompt to the session transcript and the view.
    pub fn push_user_message(&mut self, content: &str) {
        self.session.push_user_message(content);
        self.messages.push(ChatEntry {
            role: ChatRole::User,
            content: content.to_string(),
        });
        self.auto_scroll = true;
    }

    /// Route an assistant reply into the chat that produced it. The view
    /// gains the entry only when that chat is still the visible one.
    /// Returns false when the chat no longer exists.
    pub fn deliver_assistant_reply(&mut self, thread_id: &ThreadId, reply: &str) -> bool {
        let active = self.session.thread_id.as_ref() == Some(thread_id);
        if !self.session.push_assistant_message_for(thread_id, reply) {
            return false;
        }
        if active {
            self.messages.push(ChatEntry {
                role: ChatRole::Assistant,
                content: reply.to_string(),
            });
            self.maybe_enable_auto_scroll();
        }
        true
    }

    /// Append a view-only notice (error or confirmation); the session
    /// transcript is untouched.
    pub fn push_notice(&mut self, content: impl Into<String>) {
        self.messages.push(ChatEntry {
            role: ChatRole::Notice,
            content: content.into(),
        });
        self.maybe_enable_auto_scroll();
    }

    /// Rebuild the view from the session's active transcript, dropping
    /// notices and any pending feedback widget.
    pub fn reload_transcript(&mut self) {
        debug!(
            "reloading transcript (messages={})",
            self.session.messages.len()
        );
        self.messages = self
            .session
            .messages
            .iter()
            .map(|message| ChatEntry {
                role: match message.role {
                    Role::User => ChatRole::User,
                    Role::Assistant => ChatRole::Assistant,
                },
                content: message.content.clone(),
            })
            .collect();
        self.pending_feedback = None;
        self.scroll = 0;
        self.auto_scroll = true;
        self.chat_max_scroll = 0;
        self.sync_selected_chat();
    }

    /// Mark an assistant turn as in flight.
    pub fn begin_thinking(&mut self) {
        self.thinking = true;
        self.pending_feedback = None;
        self.push_status("Assistant is thinking...");
    }

    /// Mark the in-flight turn as finished.
    pub fn finish_thinking(&mut self) {
        self.thinking = false;
        self.push_status("idle");
    }

    /// Advance the spinner on each tick while a turn is in flight.
    pub fn tick(&mut self) {
        if self.thinking {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    /// Current spinner frame.
    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }

    /// Point the sidebar highlight at the session's current chat.
    pub fn sync_selected_chat(&mut self) {
        self.selected_chat = self.session.current_index().unwrap_or(0);
    }

    /// Move the sidebar highlight up.
    pub fn select_previous_chat(&mut self) {
        if self.selected_chat > 0 {
            self.selected_chat -= 1;
        }
    }

    /// Move the sidebar highlight down.
    pub fn select_next_chat(&mut self) {
        if self.selected_chat + 1 < self.session.chat_count() {
            self.selected_chat += 1;
        }
    }

    /// Scroll the chat view upward by a number of lines.
    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scroll the chat view downward by a number of lines.
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = min(self.scroll.saturating_add(lines), self.chat_max_scroll);
        if self.scroll >= self.chat_max_scroll {
            self.auto_scroll = true;
        }
    }

    /// Scroll to the top of the chat view.
    pub fn scroll_to_top(&mut self) {
        self.auto_scroll = false;
        self.scroll = 0;
    }

    /// Enable auto-scrolling to the bottom.
    pub fn enable_auto_scroll(&mut self) {
        self.auto_scroll = true;
        self.scroll = self.chat_max_scroll;
    }

    /// Update scroll bounds after layout changes.
    ///
    /// Only snaps to the new bottom when `auto_scroll` is on or the user
    /// was already pinned to the exact bottom before the update, so a
    /// manual scroll position is never yanked back down.
    pub fn update_scroll_bounds(&mut self, max_scroll: u16) {
        let was_at_bottom = self.scroll >= self.chat_max_scroll;
        self.chat_max_scroll = max_scroll;
        if self.auto_scroll || was_at_bottom {
            self.scroll = max_scroll;
            self.auto_scroll = true;
        } else {
            self.scroll = self.scroll.min(max_scroll);
        }
    }

    /// Keep the scroll pinned to the bottom when auto-scroll is active.
    fn maybe_enable_auto_scroll(&mut self) {
        if self.auto_scroll {
            self.scroll = self.chat_max_scroll;
        }
    }

    /// Render transcript entries into styled lines for the UI.
    pub fn render_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if self.messages.is_empty() {
            lines.push(Line::from(Span::styled(
                " No messages yet. Type a question below to start.",
                Style::default().fg(Color::Rgb(128, 128, 128)),
            )));
            return lines;
        }

        for (idx, entry) in self.messages.iter().enumerate() {
            let (prefix, prefix_style) = match entry.role {
                ChatRole::User => (
                    " you ",
                    Style::default()
                        .fg(Color::Rgb(10, 10, 10))
                        .bg(Color::Rgb(107, 161, 230))
                        .add_modifier(Modifier::BOLD),
                ),
                ChatRole::Assistant => (
                    " buddy ",
                    Style::default()
                        .fg(Color::Rgb(10, 10, 10))
                        .bg(Color::Rgb(121, 184, 130))
                        .add_modifier(Modifier::BOLD),
                ),
                ChatRole::Notice => (
                    " notice ",
                    Style::default()
                        .fg(Color::Rgb(10, 10, 10))
                        .bg(Color::Rgb(229, 192, 123))
                        .add_modifier(Modifier::BOLD),
                ),
            };

            let content_style = match entry.role {
                ChatRole::User | ChatRole::Assistant => {
                    Style::default().fg(Color::Rgb(238, 238, 238))
                }
                ChatRole::Notice => Style::default().fg(Color::Rgb(229, 192, 123)),
            };

            // Role badge line
            lines.push(Line::from(vec![Span::styled(prefix, prefix_style)]));

            // Content lines with left padding
            let mut content_lines = entry.content.lines();
            if let Some(first) = content_lines.next() {
                if !first.is_empty() {
                    lines.push(Line::from(Span::styled(format!(" {first}"), content_style)));
                }
                for line in content_lines {
                    lines.push(Line::from(Span::styled(format!(" {line}"), content_style)));
                }
            }

            if idx + 1 < self.messages.len() {
                lines.push(Line::from(Span::raw("")));
            }
        }

        // Trailing padding so the last message can always be scrolled fully
        // into view even if wrapped-line counting is slightly off.
        lines.push(Line::from(Span::raw("")));

        lines
    }
}
