//! Convodash core
//!
//! This crate provides the core of a conversational dashboard application:
//! a chat backend streams newline-delimited JSON events, the conversation
//! derives a payload description (which sections and fields to visualize),
//! and a separate analytics backend returns the values to render.
//!
//! Three pieces cooperate:
//!
//! 1. [`stream::StreamParser`] reassembles the chunked response body into
//!    ordered, typed [`stream::StreamEvent`]s, tolerating records split at
//!    arbitrary chunk boundaries.
//! 2. [`session::ChatSession`] owns the conversation state and applies stream
//!    events to it, discarding events from cancelled turns.
//! 3. [`projection::project`] deterministically maps a payload description
//!    plus a result set into a chart series or table model for any rendering
//!    engine.
//!
//! ```rust
//! use convodash::stream::{StreamParser, StreamEvent};
//!
//! let mut parser = StreamParser::new();
//! let events = parser.feed("{\"type\":\"threadID\",\"content\":\"abc\"}\n");
//! assert!(matches!(&events[0], StreamEvent::ThreadAssigned { thread_id } if thread_id == "abc"));
//! ```
//!
//! ## Core Principles
//!
//! 1. **Resilient decoding**: malformed stream records are skipped or
//!    re-buffered, never fatal to the stream.
//! 2. **Decode once at the boundary**: wire shapes become typed values when
//!    they arrive; downstream code never re-inspects raw JSON.
//! 3. **Pure projection**: identical inputs always produce identical chart
//!    and table models.
//! 4. **Explicit state**: one typed session per conversation, one typed
//!    finite-state machine per fetched resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

// ============================================================================
// Modules
// ============================================================================

pub mod history;
pub mod payload;
pub mod projection;
pub mod session;
pub mod stream;

mod util;

#[cfg(feature = "client")]
pub mod client;

pub use history::{ConversationSummary, HistoryRecord};
pub use payload::{DashboardData, FieldDescriptor, FieldKind, PayloadDescription};
pub use projection::{ChartKind, Projection, SeriesModel, TableModel};
pub use session::{ChatRequest, ChatSession, DashboardResource, ResourceState, TurnToken};
pub use stream::{StreamEvent, StreamParser};

// ============================================================================
// Core Conversation Types
// ============================================================================

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing into the chat box
    User,
    /// The assistant on the other end of the stream
    Assistant,
}

impl Sender {
    /// Convert to string representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single message in a conversation
///
/// Messages are created locally (user input, streamed assistant responses)
/// or reconstructed from the history endpoint. Streaming updates replace
/// `text` wholesale; the stream parser always carries the full accumulated
/// text, not a delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID (ULID for locally created messages)
    pub id: String,
    /// Message sender (user or assistant)
    pub sender: Sender,
    /// Message text
    pub text: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message with a freshly minted ID, stamped now
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Create an assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    /// Set a specific ID (useful for history reconstruction or testing)
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set a specific timestamp (useful for history reconstruction)
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A conversation thread
///
/// A thread is created locally when the user starts a new chat and is
/// reconciled with the server-assigned id once the stream delivers one.
/// [`session::ChatSession`] tracks that server id separately; this struct
/// only carries the locally owned data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationThread {
    /// Local thread ID (ULID)
    pub id: String,
    /// Display title, shown in the conversation sidebar
    pub title: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Messages in arrival order
    pub messages: Vec<Message>,
}

impl ConversationThread {
    /// Create an empty thread titled "New Chat"
    pub fn new() -> Self {
        Self::with_title("New Chat")
    }

    /// Create an empty thread with a title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            title: title.into(),
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Append a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The most recent message, if any
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Mutable access to the most recent assistant message
    ///
    /// Streaming updates rewrite the text of the message they created; only
    /// the trailing assistant message is ever a streaming target.
    pub fn last_assistant_mut(&mut self) -> Option<&mut Message> {
        self.messages
            .last_mut()
            .filter(|m| m.sender == Sender::Assistant)
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the thread has no messages yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for ConversationThread {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello");
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.text, "Hello");
        assert!(!msg.id.is_empty());

        let msg = Message::assistant("Hi there!");
        assert_eq!(msg.sender, Sender::Assistant);
        assert_eq!(msg.text, "Hi there!");
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::user("one");
        let b = Message::user("one");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_sender_string_conversion() {
        assert_eq!(Sender::User.as_str(), "user");
        assert_eq!(Sender::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::user("Test message");
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.sender, Sender::User);
        assert_eq!(deserialized.text, "Test message");
    }

    #[test]
    fn test_sender_matches_wire_format() {
        let json = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert_eq!(json["sender"], "assistant");
    }

    #[test]
    fn test_thread_starts_empty() {
        let thread = ConversationThread::new();
        assert_eq!(thread.title, "New Chat");
        assert!(thread.is_empty());
        assert_eq!(thread.len(), 0);
    }

    #[test]
    fn test_last_assistant_mut() {
        let mut thread = ConversationThread::new();
        thread.push(Message::user("question"));
        assert!(thread.last_assistant_mut().is_none());

        thread.push(Message::assistant("answer"));
        {
            let last = thread.last_assistant_mut().unwrap();
            last.text = "longer answer".to_string();
        }
        assert_eq!(thread.last().unwrap().text, "longer answer");

        // A trailing user message hides earlier assistant messages
        thread.push(Message::user("follow-up"));
        assert!(thread.last_assistant_mut().is_none());
    }
}
