//! Typed payload description, decoded once at the wire boundary.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Error decoding a payload description
#[derive(Error, Debug)]
pub enum PayloadError {
    /// The content is not a JSON object at all
    #[error("payload content is not a JSON object")]
    NotAnObject,

    /// The object carries no `keyToFieldList` key
    ///
    /// This is how non-payload records are recognized; callers usually treat
    /// it as "not for me" rather than as a failure.
    #[error("payload content has no keyToFieldList")]
    MissingFieldList,

    /// A section's field list did not decode
    #[error("invalid field list for section `{section}`: {source}")]
    InvalidSection {
        section: String,
        source: serde_json::Error,
    },

    /// The surrounding shape did not decode
    #[error("payload decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Declared rendering type of a field
///
/// Unknown type strings normalize to [`FieldKind::Text`] at decode time, so
/// downstream formatting never has to reject anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain text (the default)
    #[default]
    Text,
    /// Locale-grouped numeral
    Number,
    /// Currency amount
    Currency,
    /// One-decimal percentage
    Percentage,
    /// Calendar date
    Date,
}

impl FieldKind {
    /// Parse a declared type string, normalizing unknown values to `Text`
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "number" => Self::Number,
            "currency" => Self::Currency,
            "percentage" => Self::Percentage,
            "date" => Self::Date,
            _ => Self::Text,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Currency => "currency",
            Self::Percentage => "percentage",
            Self::Date => "date",
        }
    }
}

impl Serialize for FieldKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// One field inside a payload section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Opaque field key, defined by the upstream assistant
    pub key: String,
    /// Human-readable column/point name; falls back to `key`
    #[serde(
        default,
        rename = "displayName",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
    /// Declared rendering type
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldKind>,
    /// Free-form format hint, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl FieldDescriptor {
    /// Create a descriptor with only a key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_name: None,
            kind: None,
            format: None,
        }
    }

    /// Set the display name
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the declared type
    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// The name shown to people: `displayName`, or the key when absent
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.key)
    }
}

/// A named, ordered group of fields
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Opaque section name, defined by the upstream assistant
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
}

impl Section {
    /// Create a section
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// A flattened `(section, field)` pair in payload order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatField<'a> {
    /// Owning section name
    pub section: &'a str,
    /// Field key
    pub key: &'a str,
    /// Display label (falls back to the key)
    pub label: &'a str,
    /// Declared type, defaulting to text
    pub kind: FieldKind,
    /// Format hint, if any
    pub format: Option<&'a str>,
}

/// The conversation-derived description of what to visualize
///
/// On the wire this is `{"keyToFieldList": {"<section>": [<fields>...]}}`.
/// Section order is the JSON object's insertion order and is preserved;
/// the flattened field sequence drives column and series order downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WirePayload", into = "WirePayload")]
pub struct PayloadDescription {
    sections: Vec<Section>,
}

#[derive(Serialize, Deserialize)]
struct WirePayload {
    #[serde(rename = "keyToFieldList")]
    key_to_field_list: serde_json::Map<String, Value>,
}

impl TryFrom<WirePayload> for PayloadDescription {
    type Error = PayloadError;

    fn try_from(wire: WirePayload) -> Result<Self, PayloadError> {
        let mut sections = Vec::with_capacity(wire.key_to_field_list.len());
        for (name, fields) in wire.key_to_field_list {
            let fields: Vec<FieldDescriptor> =
                serde_json::from_value(fields).map_err(|source| PayloadError::InvalidSection {
                    section: name.clone(),
                    source,
                })?;
            sections.push(Section { name, fields });
        }
        Ok(Self { sections })
    }
}

impl From<PayloadDescription> for WirePayload {
    fn from(description: PayloadDescription) -> Self {
        let mut key_to_field_list = serde_json::Map::new();
        for section in description.sections {
            let fields = serde_json::to_value(section.fields)
                .unwrap_or_else(|_| Value::Array(Vec::new()));
            key_to_field_list.insert(section.name, fields);
        }
        Self { key_to_field_list }
    }
}

impl PayloadDescription {
    /// Build a description from already-typed sections
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Decode a payload description from raw record content
    ///
    /// Returns [`PayloadError::MissingFieldList`] when the object is not a
    /// payload at all, which callers use to ignore unrelated content.
    pub fn from_value(value: &Value) -> Result<Self, PayloadError> {
        let object = value.as_object().ok_or(PayloadError::NotAnObject)?;
        if !object.contains_key("keyToFieldList") {
            return Err(PayloadError::MissingFieldList);
        }
        let wire: WirePayload = serde_json::from_value(value.clone())?;
        wire.try_into()
    }

    /// Sections in declaration order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Flatten into `(section, field)` pairs, preserving section order then
    /// field order within each section
    pub fn fields(&self) -> impl Iterator<Item = FlatField<'_>> {
        self.sections.iter().flat_map(|section| {
            section.fields.iter().map(move |field| FlatField {
                section: &section.name,
                key: &field.key,
                label: field.label(),
                kind: field.kind.unwrap_or_default(),
                format: field.format.as_deref(),
            })
        })
    }

    /// Whether there is nothing to display (no sections, or only empty ones)
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.fields.is_empty())
    }
}
