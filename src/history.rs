//! Deterministic reconstruction of conversations from the history endpoint.
//!
//! The history endpoint answers with thread-id → list of records, each record
//! holding one user/assistant exchange plus the payload and chart hint that
//! were current at the time. Everything here is a pure transform of those
//! records; fetching them is the client's job.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::payload::PayloadDescription;
use crate::util::parse_datetime;
use crate::Message;

/// Shown when a thread has no user message to title itself after
pub const UNTITLED: &str = "Untitled Conversation";

/// One record from the conversation-history endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Backend record id (number or string); used to derive message ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// What the user asked
    #[serde(default, rename = "userMessage", skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
    /// Assistant response
    #[serde(default, rename = "limResponse", skip_serializing_if = "Option::is_none")]
    pub lim_response: Option<String>,
    /// Older records carry the response under this name instead
    #[serde(default, rename = "botResponse", skip_serializing_if = "Option::is_none")]
    pub bot_response: Option<String>,
    /// Stringified payload description JSON, when the exchange produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Chart hint that accompanied the payload
    #[serde(default, rename = "chartType", skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    /// Epoch milliseconds or a datetime string
    #[serde(default, rename = "createdTime", skip_serializing_if = "Value::is_null")]
    pub created_time: Value,
}

impl HistoryRecord {
    /// Parsed creation time, when the record carries a usable one
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_datetime(&self.created_time)
    }

    /// The assistant response, whichever field it arrived under
    pub fn response(&self) -> Option<&str> {
        self.lim_response
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.bot_response
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            })
    }
}

/// A sidebar entry for one stored thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Server thread id
    pub thread_id: String,
    /// Latest user message, or [`UNTITLED`]
    pub title: String,
    /// Most recent record time in the thread
    pub last_activity: Option<DateTime<Utc>>,
}

/// Rebuild the ordered message list for one thread
///
/// Records sort ascending by creation time (records without one sort first),
/// then each record contributes one user message and one assistant message,
/// in that order, skipping empty sides. Message ids derive from the record id
/// so reloading a thread yields identical ids.
pub fn messages_from_records(records: &[HistoryRecord]) -> Vec<Message> {
    let mut sorted: Vec<&HistoryRecord> = records.iter().collect();
    sorted.sort_by_key(|record| record.created_at());

    let mut messages = Vec::new();
    for (index, record) in sorted.iter().enumerate() {
        let timestamp = record
            .created_at()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let record_key = match &record.id {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => index.to_string(),
        };

        if let Some(text) = record
            .user_message
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            messages.push(
                Message::user(text)
                    .with_id(format!("{record_key}-user"))
                    .with_timestamp(timestamp),
            );
        }
        if let Some(text) = record.response() {
            messages.push(
                Message::assistant(text)
                    .with_id(format!("{record_key}-bot"))
                    .with_timestamp(timestamp),
            );
        }
    }
    messages
}

/// Restore the dashboard view from a thread's latest record
///
/// The stored payload is stringified JSON; when it does not decode the view
/// restores empty (with a warning) and the conversation still loads. The
/// chart hint only matters alongside a usable payload.
pub fn restore_view(records: &[HistoryRecord]) -> (Option<PayloadDescription>, Option<String>) {
    let Some(last) = records.iter().max_by_key(|record| record.created_at()) else {
        return (None, None);
    };

    let payload = last
        .payload
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| match serde_json::from_str::<PayloadDescription>(raw) {
            Ok(payload) => Some(payload),
            Err(err) => {
                log::warn!("ignoring malformed stored payload: {err}");
                None
            }
        });

    let chart_type = if payload.is_some() {
        last.chart_type.clone()
    } else {
        None
    };
    (payload, chart_type)
}

/// Title for a thread: its latest user message, or [`UNTITLED`]
pub fn thread_title(records: &[HistoryRecord]) -> String {
    records
        .iter()
        .max_by_key(|record| record.created_at())
        .and_then(|record| record.user_message.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Build the sidebar list, newest thread first
///
/// Thread-id tiebreak keeps the order reproducible even though the wire map
/// has no order of its own.
pub fn summarize_threads(threads: &HashMap<String, Vec<HistoryRecord>>) -> Vec<ConversationSummary> {
    let mut summaries: Vec<ConversationSummary> = threads
        .iter()
        .map(|(thread_id, records)| ConversationSummary {
            thread_id: thread_id.clone(),
            title: thread_title(records),
            last_activity: records.iter().filter_map(|r| r.created_at()).max(),
        })
        .collect();
    summaries.sort_by(|a, b| {
        b.last_activity
            .cmp(&a.last_activity)
            .then_with(|| a.thread_id.cmp(&b.thread_id))
    });
    summaries
}
