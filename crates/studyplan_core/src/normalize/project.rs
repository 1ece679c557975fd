//! Projection of unwrapped extraction fields onto `NormalizedDocument`.

use super::unwrap::normalize_value;
use super::{NormalizeError, NormalizeResult};
use crate::model::document::{
    scalar_to_code, scalar_to_integer, scalar_to_string, Course, NormalizedDocument,
};
use crate::model::tagged::TaggedValue;
use serde_json::{Map, Value};

const FIELD_DOC_ID: &str = "DOC_ID";
const FIELD_FACULTY: &str = "FACULTAD";
const FIELD_PROGRAM: &str = "CARRERA";
const FIELD_PLAN: &str = "PLAN";

const FIELD_SEQUENCE: &str = "NUM_ASIG";
const FIELD_CODE: &str = "COD_ASIG";
const FIELD_FOUNDATIONAL: &str = "FUNDAMENTAL";
const FIELD_TITLE: &str = "ASIGNATURA";
const FIELD_PREREQUISITES: &str = "REQUISITOS";
const FIELD_YEAR: &str = "AÑO";
const FIELD_TERM: &str = "SEMESTRE";

/// Unwraps `tree` and projects it onto the document shape.
///
/// # Errors
/// - `MissingIdentity` when `DOC_ID` is absent or blank after unwrapping.
pub fn normalize_document(tree: &TaggedValue) -> NormalizeResult<NormalizedDocument> {
    project_document(&normalize_value(tree))
}

/// Projects an already envelope-free field mapping onto the document shape.
///
/// Course entries never carry `passed` at this stage.
pub fn project_document(fields: &Value) -> NormalizeResult<NormalizedDocument> {
    let id = fields
        .get(FIELD_DOC_ID)
        .and_then(scalar_to_string)
        .filter(|id| !id.trim().is_empty())
        .ok_or(NormalizeError::MissingIdentity)?;

    let plan = match fields.get(FIELD_PLAN) {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(Value::as_object)
            .map(project_course)
            .collect(),
        _ => Vec::new(),
    };

    Ok(NormalizedDocument {
        id,
        faculty: text_field(fields, FIELD_FACULTY),
        program: text_field(fields, FIELD_PROGRAM),
        plan,
    })
}

fn project_course(entry: &Map<String, Value>) -> Course {
    Course {
        sequence_number: entry.get(FIELD_SEQUENCE).and_then(scalar_to_integer),
        code: entry.get(FIELD_CODE).and_then(scalar_to_code),
        is_foundational: entry.get(FIELD_FOUNDATIONAL).is_some_and(as_flag),
        title: entry.get(FIELD_TITLE).and_then(scalar_to_string),
        prerequisites: prerequisites(entry.get(FIELD_PREREQUISITES)),
        year: entry.get(FIELD_YEAR).and_then(scalar_to_string),
        term: entry.get(FIELD_TERM).and_then(scalar_to_string),
        passed: None,
    }
}

fn text_field(fields: &Value, key: &str) -> String {
    fields
        .get(key)
        .and_then(scalar_to_string)
        .unwrap_or_default()
}

fn as_flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn prerequisites(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(other) => scalar_to_string(other).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_document, project_document};
    use crate::model::tagged::TaggedValue;
    use crate::normalize::NormalizeError;
    use serde_json::json;

    #[test]
    fn missing_optional_fields_get_defaults() {
        let document = project_document(&json!({
            "DOC_ID": "doc-1",
            "PLAN": [{"COD_ASIG": 101}]
        }))
        .unwrap();

        let course = &document.plan[0];
        assert_eq!(course.code.as_deref(), Some("101"));
        assert!(course.prerequisites.is_empty());
        assert!(!course.is_foundational);
        assert_eq!(course.title, None);
        assert_eq!(course.sequence_number, None);
        assert_eq!(course.passed, None);
        assert_eq!(document.faculty, "");
    }

    #[test]
    fn null_prerequisites_become_empty() {
        let document = project_document(&json!({
            "DOC_ID": "doc-1",
            "PLAN": [{"COD_ASIG": "A1", "REQUISITOS": null, "FUNDAMENTAL": null}]
        }))
        .unwrap();
        assert!(document.plan[0].prerequisites.is_empty());
        assert!(!document.plan[0].is_foundational);
    }

    #[test]
    fn course_code_is_trimmed_to_its_overlay_key() {
        let document = project_document(&json!({
            "DOC_ID": "doc-1",
            "PLAN": [{"COD_ASIG": "MAT101 "}, {"COD_ASIG": "  "}]
        }))
        .unwrap();
        assert_eq!(document.plan[0].code.as_deref(), Some("MAT101"));
        assert_eq!(document.plan[1].code, None);
    }

    #[test]
    fn foundational_flag_accepts_boolean_strings() {
        let document = project_document(&json!({
            "DOC_ID": "doc-1",
            "PLAN": [
                {"COD_ASIG": "A1", "FUNDAMENTAL": "TRUE"},
                {"COD_ASIG": "A2", "FUNDAMENTAL": " true "},
                {"COD_ASIG": "A3", "FUNDAMENTAL": "false"},
                {"COD_ASIG": "A4", "FUNDAMENTAL": "si"},
                {"COD_ASIG": "A5", "FUNDAMENTAL": 1}
            ]
        }))
        .unwrap();

        let flags: Vec<bool> = document
            .plan
            .iter()
            .map(|course| course.is_foundational)
            .collect();
        assert_eq!(flags, vec![true, true, false, false, false]);
    }

    #[test]
    fn lone_prerequisite_becomes_single_item_list() {
        let document = project_document(&json!({
            "DOC_ID": "doc-1",
            "PLAN": [
                {"COD_ASIG": "A2", "REQUISITOS": "101"},
                {"COD_ASIG": "A3", "REQUISITOS": 102.0}
            ]
        }))
        .unwrap();
        assert_eq!(document.plan[0].prerequisites, vec!["101".to_string()]);
        assert_eq!(document.plan[1].prerequisites, vec!["102".to_string()]);
    }

    #[test]
    fn numeric_doc_id_uses_canonical_string_form() {
        let document = project_document(&json!({"DOC_ID": 2024, "PLAN": []})).unwrap();
        assert_eq!(document.id, "2024");

        let float_id = project_document(&json!({"DOC_ID": 2024.0})).unwrap();
        assert_eq!(float_id.id, "2024");
    }

    #[test]
    fn unknown_plan_fields_are_dropped() {
        let document = project_document(&json!({
            "DOC_ID": "doc-1",
            "PLAN": [{
                "NUM_ASIG": 3,
                "COD_ASIG": 303,
                "FUNDAMENTAL": true,
                "ASIGNATURA": "Algebra",
                "REQUISITOS": [101, "102", null],
                "AÑO": 2,
                "SEMESTRE": "II",
                "CREDITOS": 6,
                "PASSED": true
            }]
        }))
        .unwrap();

        let rendered = serde_json::to_value(&document.plan[0]).unwrap();
        assert_eq!(
            rendered,
            json!({
                "NUM_ASIG": 3,
                "COD_ASIG": "303",
                "FUNDAMENTAL": true,
                "ASIGNATURA": "Algebra",
                "REQUISITOS": ["101", "102"],
                "AÑO": "2",
                "SEMESTRE": "II"
            })
        );
    }

    #[test]
    fn non_mapping_plan_entries_are_skipped() {
        let document = project_document(&json!({
            "DOC_ID": "doc-1",
            "PLAN": [null, "stray", {"COD_ASIG": 1}]
        }))
        .unwrap();
        assert_eq!(document.plan.len(), 1);

        let scalar_plan = project_document(&json!({"DOC_ID": "doc-1", "PLAN": "none"})).unwrap();
        assert!(scalar_plan.plan.is_empty());
    }

    #[test]
    fn missing_or_blank_identity_is_reported() {
        for fields in [
            json!({}),
            json!({"DOC_ID": null}),
            json!({"DOC_ID": "  "}),
            json!({"DOC_ID": ["doc"]}),
        ] {
            assert_eq!(
                project_document(&fields).unwrap_err(),
                NormalizeError::MissingIdentity
            );
        }
    }

    #[test]
    fn tagged_tree_normalizes_end_to_end() {
        let tree = TaggedValue::from(json!({
            "DOC_ID": {"type": "string", "valueString": "doc-1"},
            "FACULTAD": {"type": "string", "valueString": "Ingenieria"},
            "CARRERA": {"type": "string", "valueString": "Civil Informatica"},
            "PLAN": {"type": "array", "valueArray": [{
                "type": "object",
                "valueObject": {
                    "NUM_ASIG": {"type": "number", "valueNumber": 1},
                    "COD_ASIG": {"type": "number", "valueNumber": 101},
                    "ASIGNATURA": {"type": "string", "valueString": "Calculo I"}
                }
            }]}
        }));

        let document = normalize_document(&tree).unwrap();
        assert_eq!(document.id, "doc-1");
        assert_eq!(document.faculty, "Ingenieria");
        assert_eq!(document.program, "Civil Informatica");
        assert_eq!(document.plan.len(), 1);
        assert_eq!(document.plan[0].code.as_deref(), Some("101"));
        assert_eq!(document.plan[0].sequence_number, Some(1));
        assert_eq!(document.plan[0].title.as_deref(), Some("Calculo I"));
        assert!(document.plan[0].prerequisites.is_empty());
        assert!(!document.plan[0].is_foundational);
    }

    #[test]
    fn empty_doc_id_envelope_is_missing_identity() {
        let tree = TaggedValue::from(json!({"DOC_ID": {"type": "string"}}));
        assert_eq!(
            normalize_document(&tree).unwrap_err(),
            NormalizeError::MissingIdentity
        );
    }
}
