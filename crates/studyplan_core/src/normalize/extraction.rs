//! Content selection for raw extraction-service responses.

use super::project::normalize_document;
use super::{NormalizeError, NormalizeResult};
use crate::model::document::NormalizedDocument;
use crate::model::tagged::TaggedValue;
use serde_json::{Map, Value};

/// Returns the first content block of `{ "result": { "contents": [...] } }`.
///
/// # Errors
/// - `NoContents` when the path is missing, not a list, or empty.
pub fn first_content(response: &Value) -> NormalizeResult<&Value> {
    response
        .get("result")
        .and_then(|result| result.get("contents"))
        .and_then(Value::as_array)
        .and_then(|contents| contents.first())
        .ok_or(NormalizeError::NoContents)
}

/// Normalizes the `fields` tree of one content block.
///
/// A content block without `fields` normalizes as an empty mapping.
pub fn normalize_content(content: &Value) -> NormalizeResult<NormalizedDocument> {
    let fields = content
        .get("fields")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));
    normalize_document(&TaggedValue::from(fields))
}

/// Selects the first content block of a response and normalizes it.
pub fn normalize_extraction(response: &Value) -> NormalizeResult<NormalizedDocument> {
    normalize_content(first_content(response)?)
}

#[cfg(test)]
mod tests {
    use super::{first_content, normalize_content, normalize_extraction};
    use crate::normalize::NormalizeError;
    use serde_json::json;

    #[test]
    fn first_content_requires_a_non_empty_list() {
        assert_eq!(
            first_content(&json!({})).unwrap_err(),
            NormalizeError::NoContents
        );
        assert_eq!(
            first_content(&json!({"result": {"contents": []}})).unwrap_err(),
            NormalizeError::NoContents
        );
        assert_eq!(
            first_content(&json!({"result": {"contents": [{"n": 1}, {"n": 2}]}})).unwrap(),
            &json!({"n": 1})
        );
    }

    #[test]
    fn content_without_fields_has_no_identity() {
        assert_eq!(
            normalize_content(&json!({"markdown": "..."})).unwrap_err(),
            NormalizeError::MissingIdentity
        );
    }

    #[test]
    fn only_first_content_is_normalized() {
        let response = json!({
            "result": {
                "contents": [
                    {"fields": {"DOC_ID": {"type": "string", "valueString": "first"}}},
                    {"fields": {"DOC_ID": {"type": "string", "valueString": "second"}}}
                ]
            }
        });
        assert_eq!(normalize_extraction(&response).unwrap().id, "first");
    }
}
