use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an import was rejected.
///
/// Stages run in a fixed order and the first failing stage decides the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportErrorCode {
    InvalidJson,
    InvalidPayload,
    UnknownFormpack,
    FormpackMismatch,
    SchemaMismatch,
    InvalidRevisions,
    UnsupportedLocale,
}

impl ImportErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportErrorCode::InvalidJson => "invalid_json",
            ImportErrorCode::InvalidPayload => "invalid_payload",
            ImportErrorCode::UnknownFormpack => "unknown_formpack",
            ImportErrorCode::FormpackMismatch => "formpack_mismatch",
            ImportErrorCode::SchemaMismatch => "schema_mismatch",
            ImportErrorCode::InvalidRevisions => "invalid_revisions",
            ImportErrorCode::UnsupportedLocale => "unsupported_locale",
        }
    }
}

impl fmt::Display for ImportErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected import, returned as data rather than raised.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}", describe(.code, .message))]
pub struct ImportError {
    pub code: ImportErrorCode,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

fn describe(code: &ImportErrorCode, message: &Option<String>) -> String {
    match message {
        Some(m) => format!("{code}: {m}"),
        None => code.to_string(),
    }
}

impl ImportError {
    pub fn new(code: ImportErrorCode) -> Self {
        Self {
            code,
            message: None,
        }
    }

    pub fn with_message(code: ImportErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }
}

impl From<ImportErrorCode> for ImportError {
    fn from(code: ImportErrorCode) -> Self {
        Self::new(code)
    }
}
