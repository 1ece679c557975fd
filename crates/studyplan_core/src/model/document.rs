//! Normalized study plan document model.
//!
//! # Responsibility
//! - Define the envelope-free document and course shapes.
//! - Own the canonical scalar-to-string form used for course codes.
//!
//! # Invariants
//! - `NormalizedDocument::id` is the identity; it is never empty once a
//!   document has passed ingestion.
//! - `Course::passed` is only ever populated by the overlay merge; stored
//!   payloads carry no status.
//! - Serialized field names match the extraction service (`DOC_ID`,
//!   `COD_ASIG`, ...), so stored payloads and uploaded plans share a schema.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// One study plan, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    #[serde(rename = "DOC_ID", deserialize_with = "deserialize_required_scalar")]
    pub id: String,
    #[serde(rename = "FACULTAD", default)]
    pub faculty: String,
    #[serde(rename = "CARRERA", default)]
    pub program: String,
    #[serde(rename = "PLAN", default)]
    pub plan: Vec<Course>,
}

/// One course entry inside a document's plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "NUM_ASIG", default, deserialize_with = "deserialize_integer")]
    pub sequence_number: Option<i64>,
    /// Join key for status overlays, always in canonical code form.
    #[serde(rename = "COD_ASIG", default, deserialize_with = "deserialize_code")]
    pub code: Option<String>,
    #[serde(rename = "FUNDAMENTAL", default)]
    pub is_foundational: bool,
    #[serde(
        rename = "ASIGNATURA",
        default,
        deserialize_with = "deserialize_scalar"
    )]
    pub title: Option<String>,
    #[serde(rename = "REQUISITOS", default)]
    pub prerequisites: Vec<String>,
    #[serde(rename = "AÑO", default, deserialize_with = "deserialize_scalar")]
    pub year: Option<String>,
    #[serde(rename = "SEMESTRE", default, deserialize_with = "deserialize_scalar")]
    pub term: Option<String>,
    #[serde(rename = "PASSED", default, skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
}

/// A stored document together with its optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(flatten)]
    pub document: NormalizedDocument,
    #[serde(rename = "NAME", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NormalizedDocument {
    /// Creates an empty plan for the given identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            faculty: String::new(),
            program: String::new(),
            plan: Vec::new(),
        }
    }

    /// Returns whether the identity is usable as a primary key.
    pub fn has_identity(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// Returns a copy with every course status cleared.
    ///
    /// This is the shape that may be written to storage.
    pub fn without_status(&self) -> Self {
        let mut stripped = self.clone();
        for course in &mut stripped.plan {
            course.passed = None;
        }
        stripped
    }
}

impl Course {
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }
}

impl DocumentRecord {
    pub fn new(document: NormalizedDocument, name: Option<String>) -> Self {
        Self { document, name }
    }
}

/// Renders a JSON scalar in canonical string form.
///
/// Strings pass through, integral numbers drop any fractional part
/// (`101.0` becomes `"101"`), booleans render as `true`/`false`.
/// Null, arrays and objects have no string form.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(canonical_number(number)),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Renders a course code scalar in the form overlays are keyed by.
///
/// Same as [`scalar_to_string`] with surrounding whitespace removed; a code
/// that is blank after trimming counts as absent.
pub fn scalar_to_code(value: &Value) -> Option<String> {
    scalar_to_string(value)
        .map(|code| canonical_code(&code))
        .filter(|code| !code.is_empty())
}

/// Canonical form of a course code supplied as text.
pub fn canonical_code(code: &str) -> String {
    code.trim().to_string()
}

/// Reads an integer from an integral number or a numeric string.
pub fn scalar_to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0 && float.abs() < i64::MAX as f64)
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn canonical_number(number: &Number) -> String {
    if number.is_f64() {
        if let Some(float) = number.as_f64() {
            if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
                return (float as i64).to_string();
            }
        }
    }
    number.to_string()
}

fn deserialize_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

fn deserialize_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_code))
}

fn deserialize_required_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(&value)
        .ok_or_else(|| serde::de::Error::custom("DOC_ID must be a string or number"))
}

fn deserialize_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_integer))
}
