//! Per-session chat state.
//!
//! All state for one interactive session lives in an explicit
//! [`SessionContext`] owned by the caller; operations take it as an
//! argument instead of reaching for globals.

use crate::types::ChatMessage;
use infobuddy_remote::ThreadId;
use log::{debug, info};

/// One chat in the history: a remote thread plus its local alias and the
/// mirror of its transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatThread {
    /// Remote thread identifier.
    pub id: ThreadId,
    /// Display alias ("Chat N").
    pub alias: String,
    /// Messages exchanged on this thread.
    pub messages: Vec<ChatMessage>,
}

/// Ephemeral state for one interactive session.
///
/// History entries are kept in creation order; every entry was registered
/// through [`SessionContext::begin_thread`] with an id returned by a
/// successful thread-creation call.
#[derive(Debug, Default)]
pub struct SessionContext {
    /// Currently active remote thread, if any.
    pub thread_id: Option<ThreadId>,
    /// Transcript of the active chat.
    pub messages: Vec<ChatMessage>,
    /// All chats created in this session, in creation order.
    chats: Vec<ChatThread>,
    /// Strictly increasing counter used for aliases.
    thread_count: u32,
    /// Identifier of the chat selected in the sidebar.
    pub current_chat: Option<ThreadId>,
}

impl SessionContext {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly created thread: clear the transcript, bump the
    /// counter, record the alias, and make the thread active.
    pub fn begin_thread(&mut self, thread_id: ThreadId) {
        self.thread_count += 1;
        let alias = format!("Chat {}", self.thread_count);
        info!(
            "registered chat (thread_id={}, alias={})",
            thread_id, alias
        );
        self.messages.clear();
        self.chats.push(ChatThread {
            id: thread_id.clone(),
            alias,
            messages: Vec::new(),
        });
        self.thread_id = Some(thread_id);
        self.current_chat = self.thread_id.clone();
    }

    /// All chats in creation order.
    pub fn chats(&self) -> &[ChatThread] {
        &self.chats
    }

    /// Number of chats in the history.
    pub fn chat_count(&self) -> usize {
        self.chats.len()
    }

    /// Look up a chat by thread id.
    pub fn chat(&self, thread_id: &ThreadId) -> Option<&ChatThread> {
        self.chats.iter().find(|chat| &chat.id == thread_id)
    }

    /// Alias of the currently active chat.
    pub fn active_alias(&self) -> Option<&str> {
        let thread_id = self.thread_id.as_ref()?;
        self.chat(thread_id).map(|chat| chat.alias.as_str())
    }

    /// Index of the currently selected chat in creation order.
    pub fn current_index(&self) -> Option<usize> {
        let current = self.current_chat.as_ref()?;
        self.chats.iter().position(|chat| &chat.id == current)
    }

    /// Switch the visible transcript to another chat in the history.
    /// Returns false when the id is unknown.
    pub fn select_chat(&mut self, thread_id: &ThreadId) -> bool {
        let Some(chat) = self.chat(thread_id) else {
            return false;
        };
        debug!("selected chat (thread_id={}, alias={})", chat.id, chat.alias);
        self.messages = chat.messages.clone();
        self.current_chat = Some(thread_id.clone());
        self.thread_id = Some(thread_id.clone());
        true
    }

    /// Remove a chat from the history. Returns true when an entry was
    /// removed. The caller is responsible for starting a replacement thread
    /// when the removed chat was active.
    pub fn delete_chat(&mut self, thread_id: &ThreadId) -> bool {
        let before = self.chats.len();
        self.chats.retain(|chat| &chat.id != thread_id);
        let removed = self.chats.len() < before;
        if removed {
            info!("deleted chat (thread_id={})", thread_id);
            if self.current_chat.as_ref() == Some(thread_id) {
                self.current_chat = None;
            }
            if self.thread_id.as_ref() == Some(thread_id) {
                self.thread_id = None;
                self.messages.clear();
            }
        }
        removed
    }

    /// Append a user message to the transcript and mirror it into the
    /// active history entry.
    pub fn push_user_message(&mut self, content: impl Into<String>) {
        self.push_message(ChatMessage::user(content));
    }

    /// Append an assistant message to the transcript and mirror it into the
    /// active history entry.
    pub fn push_assistant_message(&mut self, content: impl Into<String>) {
        self.push_message(ChatMessage::assistant(content));
    }

    /// Append an assistant message to a specific chat's history entry,
    /// regardless of which chat is active. The visible transcript is only
    /// updated when that chat is the active one. Returns false when the id
    /// is unknown (the chat was deleted in the meantime).
    pub fn push_assistant_message_for(
        &mut self,
        thread_id: &ThreadId,
        content: impl Into<String>,
    ) -> bool {
        let active = self.thread_id.as_ref() == Some(thread_id);
        let Some(chat) = self.chats.iter_mut().find(|chat| &chat.id == thread_id) else {
            debug!("dropping reply for unknown chat (thread_id={})", thread_id);
            return false;
        };
        let message = ChatMessage::assistant(content);
        chat.messages.push(message.clone());
        if active {
            self.messages.push(message);
        }
        true
    }

    fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if let Some(thread_id) = self.thread_id.clone()
            && let Some(chat) = self.chats.iter_mut().find(|chat| chat.id == thread_id)
        {
            chat.messages = self.messages.clone();
        }
    }
}
