//! Incremental newline-delimited JSON stream parser.

use serde_json::Value;

use super::types::StreamEvent;
use crate::payload::{PayloadDescription, PayloadError};

/// Reassembles newline-delimited JSON records from arbitrary chunks.
///
/// One parser serves one conversation turn. Bad records never fail the
/// stream: a record that does not parse is either re-buffered (when it may be
/// a truncation at the current chunk boundary) or logged and dropped (when it
/// sits between valid lines and therefore cannot be a truncation artifact).
#[derive(Debug, Default)]
pub struct StreamParser {
    carry: String,
    message_text: String,
    message_open: bool,
}

impl StreamParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transport chunk, returning the events it completed
    ///
    /// The chunk is appended to the carry-over from previous calls, the
    /// combined buffer is split on `\n`, and every non-empty segment is tried
    /// as a candidate record. The final segment is attempted eagerly rather
    /// than blindly re-buffered: a strict prefix of a JSON object line is
    /// never itself valid JSON, so this cannot emit a record early.
    pub fn feed(&mut self, chunk: &str) -> Vec<StreamEvent> {
        let combined = std::mem::take(&mut self.carry) + chunk;
        let segments: Vec<&str> = combined.split('\n').collect();
        let last = segments.len() - 1;

        let mut events = Vec::new();
        for (index, segment) in segments.iter().enumerate() {
            let line = segment.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(record) => self.dispatch(&record, &mut events),
                // possibly a record cut off at this chunk boundary
                Err(_) if index == last => self.carry = line.to_string(),
                Err(err) => log::warn!("skipping malformed stream record: {err}"),
            }
        }
        events
    }

    /// Flush the parser when the transport signals completion
    ///
    /// Any remaining carry-over is tried once more (best effort), then the
    /// terminal [`StreamEvent::Closed`] is emitted.
    pub fn finish(mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        let leftover = std::mem::take(&mut self.carry);
        let line = leftover.trim();
        if !line.is_empty() {
            match serde_json::from_str::<Value>(line) {
                Ok(record) => self.dispatch(&record, &mut events),
                Err(err) => log::warn!("dropping truncated trailing record: {err}"),
            }
        }
        events.push(StreamEvent::Closed);
        events
    }

    /// Interpret one complete record
    ///
    /// Records carry a `type` discriminator and a `content` field. Unknown
    /// types and content of the wrong shape are ignored without noise; only
    /// JSON-level failures are worth logging, and those never reach here.
    fn dispatch(&mut self, record: &Value, out: &mut Vec<StreamEvent>) {
        let Some(kind) = record.get("type").and_then(Value::as_str) else {
            return;
        };
        let content = record.get("content");

        match kind {
            "threadID" => {
                if let Some(thread_id) = content.and_then(Value::as_str) {
                    out.push(StreamEvent::ThreadAssigned {
                        thread_id: thread_id.to_string(),
                    });
                }
            }
            "text" => {
                let Some(text) = content.and_then(Value::as_str) else {
                    return;
                };
                if text.is_empty() {
                    return;
                }
                if self.message_open {
                    self.message_text.push_str(text);
                    out.push(StreamEvent::MessageUpdated {
                        text: self.message_text.clone(),
                    });
                } else {
                    self.message_open = true;
                    self.message_text = text.to_string();
                    out.push(StreamEvent::MessageStarted {
                        text: text.to_string(),
                    });
                }
            }
            "chart" => {
                // content must be an array; only the first entry matters
                if let Some(chart_type) = content
                    .and_then(Value::as_array)
                    .and_then(|items| items.first())
                    .and_then(Value::as_str)
                {
                    out.push(StreamEvent::ChartHint {
                        chart_type: chart_type.to_string(),
                    });
                }
            }
            "payload" => {
                let Some(content) = content else { return };
                match PayloadDescription::from_value(content) {
                    Ok(payload) => out.push(StreamEvent::PayloadReady { payload }),
                    // not a payload description at all; ignore quietly
                    Err(PayloadError::MissingFieldList) | Err(PayloadError::NotAnObject) => {}
                    Err(err) => log::warn!("ignoring undecodable payload record: {err}"),
                }
            }
            _ => {}
        }
    }

    /// Drive the parser from an async stream of byte chunks
    ///
    /// Feeds every chunk through [`feed`](Self::feed), forwards each event to
    /// `on_event`, and flushes with [`finish`](Self::finish) when the stream
    /// ends. A transport error emits the terminal [`StreamEvent::Aborted`]
    /// before the error is returned, so the consumer always sees a terminal
    /// event.
    #[cfg(feature = "streaming")]
    pub async fn run<S, B, E, F>(mut self, mut stream: S, mut on_event: F) -> Result<(), E>
    where
        S: futures_util::Stream<Item = Result<B, E>> + Unpin,
        B: AsRef<[u8]>,
        F: FnMut(StreamEvent),
    {
        use futures_util::StreamExt;

        while let Some(next) = stream.next().await {
            match next {
                Ok(chunk) => {
                    let text = String::from_utf8_lossy(chunk.as_ref());
                    for event in self.feed(&text) {
                        on_event(event);
                    }
                }
                Err(err) => {
                    on_event(StreamEvent::Aborted);
                    return Err(err);
                }
            }
        }
        for event in self.finish() {
            on_event(event);
        }
        Ok(())
    }
}
