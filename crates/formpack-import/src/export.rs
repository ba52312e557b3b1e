//! Plain JSON export in the current nested shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::registry::SupportedLocale;
use crate::types::{AppMeta, FormpackRef, ImportRecord, RecordRevision, PAYLOAD_VERSION};

/// Everything needed to export one record.
#[derive(Debug, Clone)]
pub struct ExportInput {
    pub app: Option<AppMeta>,
    pub formpack: FormpackRef,
    pub title: Option<String>,
    pub locale: SupportedLocale,
    pub data: Map<String, Value>,
    pub revisions: Vec<RecordRevision>,
    /// RFC 3339 timestamp. Defaults to `chrono::Utc::now()` if `None`.
    pub exported_at: Option<String>,
}

/// Export document as written to disk (before optional encryption).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonExport {
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub app: Option<AppMeta>,
    pub formpack: FormpackRef,
    pub record: ImportRecord,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub revisions: Vec<RecordRevision>,
    pub exported_at: String,
}

impl JsonExport {
    /// Pretty-printed JSON text, ready to save or to encrypt.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn build_json_export(input: ExportInput) -> JsonExport {
    let exported_at = input
        .exported_at
        .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

    JsonExport {
        version: PAYLOAD_VERSION,
        app: input.app,
        formpack: input.formpack,
        record: ImportRecord {
            title: input.title,
            locale: input.locale,
            data: input.data,
        },
        revisions: input.revisions,
        exported_at,
    }
}
