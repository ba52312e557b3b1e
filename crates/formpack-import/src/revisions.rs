//! Shape checks for the optional revision list of an export.
//!
//! Revisions are accepted all-or-nothing: one malformed entry rejects the
//! whole list rather than being silently dropped.

use serde_json::Value;
use thiserror::Error;

use crate::types::RecordRevision;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevisionError {
    #[error("revisions must be an array")]
    NotAnArray,

    #[error("revision {index} must be an object")]
    NotAnObject { index: usize },

    #[error("revision {index} is missing an object `data` field")]
    MissingData { index: usize },

    #[error("revision {index} has a non-string `{field}`")]
    InvalidField { index: usize, field: &'static str },
}

/// Normalize the `revisions` field of an export. Absent means no revisions.
pub fn normalize_revisions(value: Option<&Value>) -> Result<Vec<RecordRevision>, RevisionError> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let entries = value.as_array().ok_or(RevisionError::NotAnArray)?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_revision(index, entry))
        .collect()
}

fn parse_revision(index: usize, entry: &Value) -> Result<RecordRevision, RevisionError> {
    let obj = entry
        .as_object()
        .ok_or(RevisionError::NotAnObject { index })?;
    let data = obj
        .get("data")
        .and_then(Value::as_object)
        .ok_or(RevisionError::MissingData { index })?;

    let optional_string = |field: &'static str| match obj.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(RevisionError::InvalidField { index, field }),
    };

    Ok(RecordRevision {
        label: optional_string("label")?,
        data: data.clone(),
        created_at: optional_string("createdAt")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_revisions_are_empty() {
        assert_eq!(normalize_revisions(None).unwrap(), vec![]);
        assert_eq!(normalize_revisions(Some(&json!([]))).unwrap(), vec![]);
    }

    #[test]
    fn parses_well_formed_revisions() {
        let value = json!([
            {"label": "v1", "data": {"name": "Ann"}, "createdAt": "2024-01-01T00:00:00Z"},
            {"data": {}}
        ]);
        let revisions = normalize_revisions(Some(&value)).unwrap();
        assert_eq!(revisions.len(), 2);
        assert_eq!(revisions[0].label.as_deref(), Some("v1"));
        assert_eq!(revisions[0].data["name"], json!("Ann"));
        assert_eq!(
            revisions[0].created_at.as_deref(),
            Some("2024-01-01T00:00:00Z")
        );
        assert_eq!(revisions[1].label, None);
        assert_eq!(revisions[1].created_at, None);
    }

    #[test]
    fn rejects_non_array() {
        assert_eq!(
            normalize_revisions(Some(&json!({"data": {}}))),
            Err(RevisionError::NotAnArray)
        );
        assert_eq!(
            normalize_revisions(Some(&json!(null))),
            Err(RevisionError::NotAnArray)
        );
    }

    #[test]
    fn one_bad_entry_rejects_the_list() {
        let value = json!([{"data": {}}, {"label": "v1"}]);
        assert_eq!(
            normalize_revisions(Some(&value)),
            Err(RevisionError::MissingData { index: 1 })
        );
        assert_eq!(
            normalize_revisions(Some(&json!([{"data": []}]))),
            Err(RevisionError::MissingData { index: 0 })
        );
        assert_eq!(
            normalize_revisions(Some(&json!(["v1"]))),
            Err(RevisionError::NotAnObject { index: 0 })
        );
        assert_eq!(
            normalize_revisions(Some(&json!([{"data": {}, "label": 3}]))),
            Err(RevisionError::InvalidField {
                index: 0,
                field: "label"
            })
        );
        assert_eq!(
            normalize_revisions(Some(&json!([{"data": {}, "createdAt": 17}]))),
            Err(RevisionError::InvalidField {
                index: 0,
                field: "createdAt"
            })
        );
    }
}
