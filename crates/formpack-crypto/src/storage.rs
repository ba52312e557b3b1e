//! Recognition of encrypted-at-rest storage payloads.
//!
//! The storage layer writes `{ "v": 1, "alg": "AES-GCM", "iv": .., "ct": .. }`
//! records into IndexedDB. Diagnostics use this predicate to report whether
//! stored data is encrypted without ever attempting to decrypt it.

use serde_json::Value;

use crate::types::CIPHER;

/// Storage payload versions currently written by the storage layer.
pub const SUPPORTED_STORAGE_VERSIONS: &[u64] = &[1];

/// True iff `value` has the exact shape of an encrypted storage record.
pub fn is_encrypted_storage_payload(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let non_empty =
        |field: &str| matches!(obj.get(field).and_then(Value::as_str), Some(s) if !s.is_empty());

    obj.get("v")
        .and_then(Value::as_u64)
        .is_some_and(|v| SUPPORTED_STORAGE_VERSIONS.contains(&v))
        && obj.get("alg").and_then(Value::as_str) == Some(CIPHER)
        && non_empty("iv")
        && non_empty("ct")
}
