//! Result set returned by the analytics backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Entity id of the aggregate ("Total") row and the only series source
pub const AGGREGATE_ID: &str = "-20";

/// One cell as delivered on the wire: `{"value": <scalar|null>}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    /// Raw scalar; `None` covers both an explicit null and an absent key
    #[serde(default)]
    pub value: Option<Value>,
}

impl FieldValue {
    /// Wrap a raw scalar
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }
}

/// Details for resolving an entity id to a human name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentDetail {
    /// Display name, when the backend knows one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whatever else the backend sends; kept so round-trips lose nothing
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl AgentDetail {
    /// Create a detail record with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            extra: serde_json::Map::new(),
        }
    }
}

/// Section → field-key → cell, for one entity
pub type SectionValues = BTreeMap<String, BTreeMap<String, FieldValue>>;

/// The analytics backend's answer for a payload description
///
/// Entity ids are opaque strings; [`AGGREGATE_ID`] marks the aggregate
/// entity. Missing entities, sections, fields, and values are all valid and
/// project to sentinels, never errors. `BTreeMap` keys give the deterministic
/// iteration order the projector relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    /// Entity id → section → field-key → cell
    #[serde(default, rename = "agentIdtoFieldToFieldValueMap")]
    pub values: BTreeMap<String, SectionValues>,
    /// Entity id → name lookup
    #[serde(default, rename = "agentIdtoAgentDetailMap")]
    pub agents: BTreeMap<String, AgentDetail>,
}

impl DashboardData {
    /// Raw value at `entity.section.key`, if the cell holds one
    ///
    /// Missing paths and explicit nulls both yield `None`; the projector
    /// treats them alike.
    pub fn value_at(&self, entity: &str, section: &str, key: &str) -> Option<&Value> {
        self.values
            .get(entity)?
            .get(section)?
            .get(key)?
            .value
            .as_ref()
    }

    /// Resolved display name for an entity, when known
    pub fn agent_name(&self, entity: &str) -> Option<&str> {
        self.agents.get(entity)?.name.as_deref()
    }

    /// Whether the result set holds no entities at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
