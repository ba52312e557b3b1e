//! Import validation and normalization for formpack JSON exports.
//!
//! Export files outlive the app version that wrote them. Importing one means
//! accepting both the current nested shape and the legacy flat shape,
//! stripping fields the app computes itself, filling defaults for fields that
//! became required later, and checking the result against a relaxed copy of
//! the formpack schema. Failures come back as one of a closed set of
//! [`ImportErrorCode`]s so the UI can tell the user exactly what to fix.
//!
//! Decryption of password-protected exports happens before this crate sees
//! the text; see `formpack-crypto`.

pub mod error;
pub mod export;
pub mod migrate;
pub mod path;
pub mod registry;
pub mod revisions;
pub mod schema;
pub mod types;
pub mod validator;

pub use error::{ImportError, ImportErrorCode};
pub use export::{build_json_export, ExportInput, JsonExport};
pub use migrate::migrate_payload;
pub use path::{get_path_value, set_path_value, set_path_value_immutable};
pub use registry::{
    is_supported_locale, ImportOptions, SupportedLocale, FORMPACK_IDS, SUPPORTED_LOCALES,
};
pub use revisions::{normalize_revisions, RevisionError};
pub use schema::{
    fill_required_defaults, lenient_schema, resolve_default, strip_read_only,
    validate_against_schema, SchemaViolation,
};
pub use types::{
    AppMeta, FormpackRef, ImportPayload, ImportRecord, RecordRevision, PAYLOAD_VERSION,
};
pub use validator::{validate_json_import, validate_json_import_with, ImportValidationResult};
