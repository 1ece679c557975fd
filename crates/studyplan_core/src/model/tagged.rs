//! Tagged value model for extraction-service output.
//!
//! # Responsibility
//! - Classify raw extraction JSON into envelope/mapping/sequence/primitive.
//! - Expose envelope slots in their fixed resolution priority.
//!
//! # Invariants
//! - A JSON object carrying a `type` key is always an `Envelope`, whatever
//!   else it carries.
//! - Slot presence is decided by key presence: `"valueString": null` is a
//!   populated string slot holding null.
//! - Keys other than the five value slots are ignored on envelopes
//!   (confidence scores, spans, source anchors).
//! - Slot contents are classified like any other node, so an envelope that
//!   (wrongly) nests another envelope in a scalar slot still unwraps fully.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Key that marks a JSON object as a leaf envelope.
pub const TYPE_MARKER: &str = "type";

const SLOT_STRING: &str = "valueString";
const SLOT_NUMBER: &str = "valueNumber";
const SLOT_BOOLEAN: &str = "valueBoolean";
const SLOT_ARRAY: &str = "valueArray";
const SLOT_OBJECT: &str = "valueObject";

/// One node of an extraction tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum TaggedValue {
    /// Type-annotated leaf wrapper.
    Envelope(Box<Envelope>),
    /// Object without a type marker; entries are tagged values themselves.
    Mapping(BTreeMap<String, TaggedValue>),
    /// Ordered list of tagged values.
    Sequence(Vec<TaggedValue>),
    /// Null, boolean, number or string, passed through as-is.
    Primitive(Value),
}

/// Leaf envelope with its declared type marker and value slots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Envelope {
    /// Declared type marker, e.g. `string` or `array`. Informational only.
    pub kind: String,
    pub value_string: Option<TaggedValue>,
    pub value_number: Option<TaggedValue>,
    pub value_boolean: Option<TaggedValue>,
    pub value_array: Option<TaggedValue>,
    pub value_object: Option<TaggedValue>,
}

/// The slot an envelope resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    String(&'a TaggedValue),
    Number(&'a TaggedValue),
    Boolean(&'a TaggedValue),
    Array(&'a TaggedValue),
    Object(&'a TaggedValue),
}

impl<'a> Slot<'a> {
    /// Returns the slot contents regardless of which slot won.
    pub fn value(self) -> &'a TaggedValue {
        match self {
            Self::String(value)
            | Self::Number(value)
            | Self::Boolean(value)
            | Self::Array(value)
            | Self::Object(value) => value,
        }
    }
}

impl Envelope {
    /// Creates an envelope with no populated slot.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Returns the winning slot in priority order
    /// string > number > boolean > array > object.
    ///
    /// `None` means no slot is populated; callers treat that as null.
    pub fn resolve(&self) -> Option<Slot<'_>> {
        if let Some(value) = &self.value_string {
            return Some(Slot::String(value));
        }
        if let Some(value) = &self.value_number {
            return Some(Slot::Number(value));
        }
        if let Some(value) = &self.value_boolean {
            return Some(Slot::Boolean(value));
        }
        if let Some(items) = &self.value_array {
            return Some(Slot::Array(items));
        }
        self.value_object.as_ref().map(Slot::Object)
    }

    fn from_object(mut object: serde_json::Map<String, Value>) -> Self {
        let kind = match object.remove(TYPE_MARKER) {
            Some(Value::String(kind)) => kind,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        Self {
            kind,
            value_string: object.remove(SLOT_STRING).map(TaggedValue::from),
            value_number: object.remove(SLOT_NUMBER).map(TaggedValue::from),
            value_boolean: object.remove(SLOT_BOOLEAN).map(TaggedValue::from),
            value_array: object.remove(SLOT_ARRAY).map(TaggedValue::from),
            value_object: object.remove(SLOT_OBJECT).map(TaggedValue::from),
        }
    }
}

impl TaggedValue {
    /// Returns whether any node at or below this one is an envelope.
    pub fn has_envelopes(&self) -> bool {
        match self {
            Self::Envelope(_) => true,
            Self::Mapping(entries) => entries.values().any(Self::has_envelopes),
            Self::Sequence(items) => items.iter().any(Self::has_envelopes),
            Self::Primitive(_) => false,
        }
    }
}

impl From<Value> for TaggedValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(object) if object.contains_key(TYPE_MARKER) => {
                Self::Envelope(Box::new(Envelope::from_object(object)))
            }
            Value::Object(object) => Self::Mapping(
                object
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            primitive => Self::Primitive(primitive),
        }
    }
}
