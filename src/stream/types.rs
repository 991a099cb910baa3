//! Type definitions for decoded stream events.

use serde::{Deserialize, Serialize};

use crate::payload::PayloadDescription;

/// One decoded unit of information from the chat backend's stream
///
/// Events arrive in the exact order their underlying `\n`-terminated JSON
/// records were completed, no matter how the transport chunked them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StreamEvent {
    /// The backend assigned (or confirmed) the conversation's thread id.
    /// Subsequent sends must carry this id and drop the new-thread flag.
    ThreadAssigned {
        /// Server-side thread id
        thread_id: String,
    },
    /// First text fragment of this turn; the consumer creates a new
    /// assistant message seeded with `text`
    MessageStarted {
        /// Initial fragment
        text: String,
    },
    /// A later text fragment arrived; `text` is the full accumulated
    /// message so far, and the consumer replaces rather than appends
    MessageUpdated {
        /// Full accumulated text
        text: String,
    },
    /// The backend suggested how to visualize the payload
    ChartHint {
        /// Chart type name, e.g. `"bar"`, `"pie"`, `"table"`
        chart_type: String,
    },
    /// The conversation produced a dashboard payload description.
    /// Any previously displayed result is stale from this point on.
    PayloadReady {
        /// Decoded description
        payload: PayloadDescription,
    },
    /// The transport signalled normal completion
    Closed,
    /// The transport failed mid-stream; terminal
    Aborted,
}
