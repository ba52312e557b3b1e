use crate::types::ImportPayload;

/// Forward-compatibility hook run on every successful import.
///
/// Only payload version 1 exists, so this returns its input unchanged.
/// Version-to-version transforms belong here.
pub fn migrate_payload(payload: ImportPayload) -> ImportPayload {
    payload
}
