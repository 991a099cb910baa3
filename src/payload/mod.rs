//! Payload descriptions and analytics result sets.
//!
//! A payload description is the conversation-derived configuration of what to
//! visualize: ordered sections, each holding an ordered list of field
//! descriptors. The analytics backend answers with a result set keyed by
//! entity id. Both shapes are decoded into typed values exactly once, at the
//! wire boundary; downstream code never touches raw JSON again.

mod description;
mod result_set;

pub use description::{
    FieldDescriptor, FieldKind, FlatField, PayloadDescription, PayloadError, Section,
};
pub use result_set::{AgentDetail, DashboardData, FieldValue, AGGREGATE_ID};
