use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::registry::SupportedLocale;

/// Payload format version produced after the migration hook.
pub const PAYLOAD_VERSION: u32 = 1;

/// Application that produced an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMeta {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<String>,
}

/// Formpack an export belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormpackRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<String>,
}

/// The record being imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    pub locale: SupportedLocale,
    /// Schema-normalized form data.
    pub data: Map<String, Value>,
}

/// A snapshot accompanying the record. Shape-checked, never schema-validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRevision {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    pub data: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<String>,
}

/// A validated, normalized import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportPayload {
    pub version: u32,
    pub formpack: FormpackRef,
    pub record: ImportRecord,
    #[serde(default)]
    pub revisions: Vec<RecordRevision>,
}
