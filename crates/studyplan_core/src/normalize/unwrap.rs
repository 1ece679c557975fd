//! Recursive envelope stripping.

use crate::model::tagged::TaggedValue;
use serde_json::Value;

/// Strips every type envelope below `node`.
///
/// Mappings keep their keys and sequences their order; primitives are
/// returned unchanged. An envelope with no populated slot becomes null.
pub fn normalize_value(node: &TaggedValue) -> Value {
    match node {
        TaggedValue::Envelope(envelope) => envelope
            .resolve()
            .map_or(Value::Null, |slot| normalize_value(slot.value())),
        TaggedValue::Mapping(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), normalize_value(value)))
                .collect(),
        ),
        TaggedValue::Sequence(items) => Value::Array(items.iter().map(normalize_value).collect()),
        TaggedValue::Primitive(value) => value.clone(),
    }
}

/// Classifies raw JSON and strips its envelopes in one call.
pub fn normalize_json(value: Value) -> Value {
    normalize_value(&TaggedValue::from(value))
}
