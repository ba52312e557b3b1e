//! Password encryption for formpack JSON exports.
//!
//! An export is either plain JSON or a [`JsonEncryptionEnvelope`]: a small
//! self-describing JSON object that carries its own KDF and cipher parameters
//! so files written today stay decryptable when defaults change.

pub mod base64url;
pub mod envelope;
pub mod error;
pub mod storage;
pub mod types;

pub use base64url::{base64url_decode, base64url_decode_array, base64url_encode};
pub use envelope::{
    decrypt_json_with_password, encrypt_json_with_password, is_json_encryption_envelope,
    try_parse_json_encryption_envelope,
};
pub use error::EnvelopeError;
pub use storage::is_encrypted_storage_payload;
pub use types::{
    JsonEncryptionEnvelope, DEFAULT_ITERATIONS, ENVELOPE_KIND, ENVELOPE_VERSION,
    SUPPORTED_ENVELOPE_VERSIONS,
};
