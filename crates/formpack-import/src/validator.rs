//! Import pipeline for plain JSON exports.
//!
//! parse -> shape -> app -> formpack -> data -> locale -> title -> revisions
//! -> strip read-only -> fill defaults -> lenient schema check -> migrate
//!
//! Every stage is a function from the previous stage's output to a value or
//! an [`ImportError`]. The first failing stage decides the reported code.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ImportError, ImportErrorCode};
use crate::migrate::migrate_payload;
use crate::registry::{ImportOptions, SupportedLocale};
use crate::revisions::normalize_revisions;
use crate::schema::{
    fill_required_defaults, lenient_schema, strip_read_only, validate_against_schema,
};
use crate::types::{FormpackRef, ImportPayload, ImportRecord, PAYLOAD_VERSION};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Outcome of an import, shaped for the UI: exactly one side is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportValidationResult {
    pub payload: Option<ImportPayload>,
    pub error: Option<ImportError>,
}

impl From<Result<ImportPayload, ImportError>> for ImportValidationResult {
    fn from(result: Result<ImportPayload, ImportError>) -> Self {
        match result {
            Ok(payload) => Self {
                payload: Some(payload),
                error: None,
            },
            Err(error) => Self {
                payload: None,
                error: Some(error),
            },
        }
    }
}

impl ImportValidationResult {
    pub fn into_result(self) -> Result<ImportPayload, ImportError> {
        match (self.payload, self.error) {
            (Some(payload), None) => Ok(payload),
            (_, Some(error)) => Err(error),
            (None, None) => Err(ImportError::new(ImportErrorCode::InvalidPayload)),
        }
    }
}

/// Validate a plain export against `schema` for the formpack the user is
/// importing into, using the formpacks shipped with this build.
pub fn validate_json_import(
    raw: &str,
    schema: &Value,
    expected_formpack_id: &str,
) -> ImportValidationResult {
    validate_json_import_with(raw, schema, expected_formpack_id, &ImportOptions::default())
}

/// [`validate_json_import`] with an explicit formpack registry.
pub fn validate_json_import_with(
    raw: &str,
    schema: &Value,
    expected_formpack_id: &str,
    options: &ImportOptions,
) -> ImportValidationResult {
    let result = run_import(raw, schema, expected_formpack_id, options);
    match &result {
        Ok(payload) => tracing::debug!(
            formpack = expected_formpack_id,
            revisions = payload.revisions.len(),
            "import accepted"
        ),
        Err(err) => tracing::debug!(
            formpack = expected_formpack_id,
            code = %err.code,
            "import rejected"
        ),
    }
    result.into()
}

fn run_import(
    raw: &str,
    schema: &Value,
    expected_formpack_id: &str,
    options: &ImportOptions,
) -> Result<ImportPayload, ImportError> {
    let value = parse_json(raw)?;
    let root = value.as_object().ok_or_else(|| {
        ImportError::with_message(ImportErrorCode::InvalidPayload, "expected a JSON object")
    })?;

    check_app(root)?;
    let formpack = resolve_formpack(root, expected_formpack_id, options)?;
    let record = record_object(root)?;
    let data = resolve_data(root, record)?;
    let locale = resolve_locale(root, record, options)?;
    let title = resolve_title(root, record)?;
    let revisions = normalize_revisions(root.get("revisions")).map_err(|e| {
        ImportError::with_message(ImportErrorCode::InvalidRevisions, e.to_string())
    })?;
    let data = normalize_data(schema, data)?;

    let payload = ImportPayload {
        version: PAYLOAD_VERSION,
        formpack,
        record: ImportRecord {
            title,
            locale,
            data,
        },
        revisions,
    };
    Ok(migrate_payload(payload))
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

fn parse_json(raw: &str) -> Result<Value, ImportError> {
    let text = raw.strip_prefix(BYTE_ORDER_MARK).unwrap_or(raw);
    if text.trim().is_empty() {
        return Err(ImportError::with_message(
            ImportErrorCode::InvalidJson,
            "file is empty",
        ));
    }
    serde_json::from_str(text)
        .map_err(|e| ImportError::with_message(ImportErrorCode::InvalidJson, e.to_string()))
}

fn check_app(root: &Map<String, Value>) -> Result<(), ImportError> {
    let Some(app) = root.get("app") else {
        return Ok(());
    };
    match app.get("id") {
        Some(Value::String(_)) => Ok(()),
        _ => Err(ImportError::with_message(
            ImportErrorCode::InvalidPayload,
            "app metadata must be an object with a string id",
        )),
    }
}

fn resolve_formpack(
    root: &Map<String, Value>,
    expected_formpack_id: &str,
    options: &ImportOptions,
) -> Result<FormpackRef, ImportError> {
    let meta = root.get("formpack").and_then(Value::as_object);
    let Some((meta, id)) = meta.and_then(|m| Some((m, m.get("id")?.as_str()?))) else {
        return Err(ImportError::with_message(
            ImportErrorCode::InvalidPayload,
            "formpack metadata must be an object with a string id",
        ));
    };

    if !options.is_known_formpack(id) {
        return Err(ImportError::with_message(
            ImportErrorCode::UnknownFormpack,
            format!("unknown formpack \"{id}\""),
        ));
    }
    if id != expected_formpack_id {
        return Err(ImportError::with_message(
            ImportErrorCode::FormpackMismatch,
            format!("export belongs to \"{id}\", not \"{expected_formpack_id}\""),
        ));
    }

    Ok(FormpackRef {
        id: id.to_string(),
        version: meta.get("version").and_then(Value::as_str).map(str::to_string),
    })
}

fn record_object(root: &Map<String, Value>) -> Result<Option<&Map<String, Value>>, ImportError> {
    match root.get("record") {
        None => Ok(None),
        Some(Value::Object(record)) => Ok(Some(record)),
        Some(_) => Err(ImportError::with_message(
            ImportErrorCode::InvalidPayload,
            "record must be an object",
        )),
    }
}

/// A place a record field may live in an export.
#[derive(Debug, Clone, Copy)]
enum Location {
    /// Current nested shape: `record.<field>`.
    Record(&'static str),
    /// Legacy flat shape: `<field>` at the top level.
    Root(&'static str),
}

impl Location {
    fn get<'a>(
        self,
        root: &'a Map<String, Value>,
        record: Option<&'a Map<String, Value>>,
    ) -> Option<&'a Value> {
        match self {
            Location::Record(field) => record.and_then(|r| r.get(field)),
            Location::Root(field) => root.get(field),
        }
    }
}

/// Tried in order; the first location holding a value wins.
const DATA_LOCATIONS: &[Location] = &[Location::Record("data"), Location::Root("data")];
const LOCALE_LOCATIONS: &[Location] = &[Location::Record("locale"), Location::Root("locale")];
const TITLE_LOCATIONS: &[Location] = &[Location::Record("title"), Location::Record("name")];

fn first_present<'a>(
    locations: &[Location],
    root: &'a Map<String, Value>,
    record: Option<&'a Map<String, Value>>,
) -> Option<&'a Value> {
    locations.iter().find_map(|loc| loc.get(root, record))
}

fn resolve_data<'a>(
    root: &'a Map<String, Value>,
    record: Option<&'a Map<String, Value>>,
) -> Result<&'a Map<String, Value>, ImportError> {
    first_present(DATA_LOCATIONS, root, record)
        .and_then(Value::as_object)
        .ok_or_else(|| {
            ImportError::with_message(
                ImportErrorCode::InvalidPayload,
                "record data must be an object",
            )
        })
}

fn resolve_locale(
    root: &Map<String, Value>,
    record: Option<&Map<String, Value>>,
    options: &ImportOptions,
) -> Result<SupportedLocale, ImportError> {
    let value = first_present(LOCALE_LOCATIONS, root, record);
    value
        .and_then(Value::as_str)
        .and_then(|code| options.accepted_locale(code))
        .ok_or_else(|| match value {
            Some(v) => ImportError::with_message(
                ImportErrorCode::UnsupportedLocale,
                format!("unsupported locale {v}"),
            ),
            None => {
                ImportError::with_message(ImportErrorCode::UnsupportedLocale, "locale is missing")
            }
        })
}

fn resolve_title(
    root: &Map<String, Value>,
    record: Option<&Map<String, Value>>,
) -> Result<Option<String>, ImportError> {
    let mut title = None;
    for value in TITLE_LOCATIONS.iter().filter_map(|loc| loc.get(root, record)) {
        let Some(s) = value.as_str() else {
            return Err(ImportError::with_message(
                ImportErrorCode::InvalidPayload,
                "record title must be a string",
            ));
        };
        title.get_or_insert_with(|| s.to_string());
    }
    Ok(title)
}

/// Strip read-only fields, fill defaults for required fields, then check the
/// result against the lenient schema. Order matters: a read-only field must
/// never be defaulted back in, and legacy data must be defaulted before the
/// check.
fn normalize_data(
    schema: &Value,
    data: &Map<String, Value>,
) -> Result<Map<String, Value>, ImportError> {
    let stripped = strip_read_only(schema, &Value::Object(data.clone()));
    let filled = fill_required_defaults(schema, &stripped);

    validate_against_schema(&lenient_schema(schema), &filled)
        .map_err(|v| ImportError::with_message(ImportErrorCode::SchemaMismatch, v.to_string()))?;

    match filled {
        Value::Object(map) => Ok(map),
        _ => Err(ImportError::new(ImportErrorCode::InvalidPayload)),
    }
}
