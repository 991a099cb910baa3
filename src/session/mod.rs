//! Typed conversation-turn state.
//!
//! One [`ChatSession`] owns everything a conversation view needs: the
//! thread, the server thread id, the typing indicator, the latest payload and
//! chart hint, and the dashboard fetch state. Stream events apply through a
//! [`TurnToken`] so a turn that was cancelled (new chat, navigation) can no
//! longer mutate the session it left behind.

mod fetch;

pub use fetch::{DashboardResource, ResourceState};

use serde::{Deserialize, Serialize};

use crate::history::{self, HistoryRecord};
use crate::payload::PayloadDescription;
use crate::projection::ChartKind;
use crate::stream::StreamEvent;
use crate::{ConversationThread, Message};


/// Rendered into the conversation when the transport fails mid-stream
pub const STREAM_ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Identity of one conversation turn
///
/// Minted by [`ChatSession::begin_turn`]; events presented with a token from
/// a superseded turn are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnToken(u64);

/// Wire shape of an outgoing chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// What the user typed
    pub user_message: String,
    /// Whether this conversation has no server thread yet
    #[serde(rename = "isNewThread")]
    pub is_new_thread: bool,
    /// Server thread id; empty until one is assigned
    pub thread_id: String,
}

/// State of one conversation and its dashboard
#[derive(Debug, Default)]
pub struct ChatSession {
    thread: ConversationThread,
    server_thread_id: Option<String>,
    typing: bool,
    turn: u64,
    chart_hint: Option<String>,
    payload: Option<PayloadDescription>,
    dashboard: DashboardResource,
}

impl ChatSession {
    /// Create a fresh session with an empty "New Chat" thread
    pub fn new() -> Self {
        Self::default()
    }

    /// The conversation thread
    pub fn thread(&self) -> &ConversationThread {
        &self.thread
    }

    /// Server-assigned thread id, once one arrived
    pub fn thread_id(&self) -> Option<&str> {
        self.server_thread_id.as_deref()
    }

    /// Whether the next send should flag a new thread
    pub fn is_new_thread(&self) -> bool {
        self.server_thread_id.is_none()
    }

    /// Whether the assistant is mid-response
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Latest payload description derived from the conversation
    pub fn payload(&self) -> Option<&PayloadDescription> {
        self.payload.as_ref()
    }

    /// Chart kind from the latest hint (table when no hint arrived)
    pub fn chart_kind(&self) -> ChartKind {
        self.chart_hint
            .as_deref()
            .map(ChartKind::parse)
            .unwrap_or_default()
    }

    /// The dashboard fetch state for this conversation
    pub fn dashboard(&self) -> &DashboardResource {
        &self.dashboard
    }

    /// Mutable dashboard fetch state (request/complete/fail transitions)
    pub fn dashboard_mut(&mut self) -> &mut DashboardResource {
        &mut self.dashboard
    }

    /// Record the user's message and open a new turn
    ///
    /// Returns the token identifying the turn plus the request to send,
    /// already carrying the thread id and new-thread flag.
    pub fn begin_turn(&mut self, user_text: &str) -> (TurnToken, ChatRequest) {
        let text = user_text.trim();
        self.thread.push(Message::user(text));
        self.typing = true;
        self.turn += 1;

        let request = ChatRequest {
            user_message: text.to_string(),
            is_new_thread: self.is_new_thread(),
            thread_id: self.server_thread_id.clone().unwrap_or_default(),
        };
        (TurnToken(self.turn), request)
    }

    /// Apply one stream event to the session
    ///
    /// Returns whether the event was applied; events from a superseded turn
    /// are discarded so a cancelled stream cannot touch a conversation that
    /// has since been reset or switched.
    pub fn apply(&mut self, token: TurnToken, event: StreamEvent) -> bool {
        if token.0 != self.turn {
            log::debug!("discarding stream event from a superseded turn");
            return false;
        }

        match event {
            StreamEvent::ThreadAssigned { thread_id } => {
                self.server_thread_id = Some(thread_id);
            }
            StreamEvent::MessageStarted { text } => {
                self.thread.push(Message::assistant(text));
                self.typing = false;
            }
            StreamEvent::MessageUpdated { text } => {
                match self.thread.last_assistant_mut() {
                    Some(message) => message.text = text,
                    None => self.thread.push(Message::assistant(text)),
                }
            }
            StreamEvent::ChartHint { chart_type } => {
                self.chart_hint = Some(chart_type);
            }
            StreamEvent::PayloadReady { payload } => {
                // whatever the dashboard shows now belongs to the old payload
                self.dashboard.invalidate();
                self.payload = Some(payload);
            }
            StreamEvent::Closed => {
                self.typing = false;
            }
            StreamEvent::Aborted => {
                self.thread.push(Message::assistant(STREAM_ERROR_MESSAGE));
                self.typing = false;
            }
        }
        true
    }

    /// Start over with an empty thread ("new chat")
    ///
    /// Also bumps the turn counter, so anything still streaming into the old
    /// conversation goes quiet.
    pub fn reset(&mut self) {
        self.thread = ConversationThread::new();
        self.server_thread_id = None;
        self.typing = false;
        self.turn += 1;
        self.chart_hint = None;
        self.payload = None;
        self.dashboard = DashboardResource::new();
    }

    /// Replace the session with a stored conversation
    pub fn load_history(&mut self, thread_id: impl Into<String>, records: &[HistoryRecord]) {
        self.reset();
        self.thread = ConversationThread::with_title(history::thread_title(records));
        self.thread.messages = history::messages_from_records(records);
        self.server_thread_id = Some(thread_id.into());

        let (payload, chart_hint) = history::restore_view(records);
        self.payload = payload;
        self.chart_hint = chart_hint;
    }
}
