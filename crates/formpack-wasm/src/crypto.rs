//! WASM bindings for formpack-crypto.

use crate::error::{envelope_error, from_js_value, to_js_value};
use formpack_crypto::{
    decrypt_json_with_password, encrypt_json_with_password, is_encrypted_storage_payload,
    is_json_encryption_envelope, try_parse_json_encryption_envelope, EnvelopeError,
    JsonEncryptionEnvelope,
};
use wasm_bindgen::prelude::*;

/// Encrypts `text` into a `formpack-json-encrypted` envelope.
///
/// Key derivation runs to completion on the calling thread before the
/// Promise settles. At the default iteration count this blocks the page for
/// a noticeable moment; call from a worker to keep the UI responsive.
#[wasm_bindgen(js_name = "encryptJsonWithPassword")]
pub async fn wasm_encrypt_json_with_password(
    text: String,
    password: String,
) -> Result<JsValue, JsValue> {
    let envelope = encrypt_json_with_password(&text, &password).map_err(envelope_error)?;
    to_js_value(&envelope)
}

/// Decrypts an envelope back to its JSON text.
///
/// The PBKDF2 iteration count is read from the envelope, which comes from an
/// untrusted file, and is only bounded by `u32::MAX`. Key derivation is
/// synchronous, so the returned Promise does not yield while it runs: a
/// hostile envelope can stall the calling thread for a very long time. Run
/// this in a Web Worker when decrypting files from unknown sources.
#[wasm_bindgen(js_name = "decryptJsonWithPassword")]
pub async fn wasm_decrypt_json_with_password(
    envelope: JsValue,
    password: String,
) -> Result<String, JsValue> {
    let value =
        from_js_value(envelope).map_err(|_| envelope_error(EnvelopeError::InvalidEnvelope))?;
    let envelope = JsonEncryptionEnvelope::from_value(&value)
        .ok_or_else(|| envelope_error(EnvelopeError::InvalidEnvelope))?;
    decrypt_json_with_password(&envelope, &password).map_err(envelope_error)
}

/// Returns the envelope object, or `null` when the text is not an encrypted
/// export.
#[wasm_bindgen(js_name = "tryParseJsonEncryptionEnvelope")]
pub fn wasm_try_parse_json_encryption_envelope(raw: &str) -> Result<JsValue, JsValue> {
    match try_parse_json_encryption_envelope(raw) {
        Some(envelope) => to_js_value(&envelope),
        None => Ok(JsValue::NULL),
    }
}

#[wasm_bindgen(js_name = "isJsonEncryptionEnvelope")]
pub fn wasm_is_json_encryption_envelope(value: JsValue) -> bool {
    from_js_value(value).is_ok_and(|v| is_json_encryption_envelope(&v))
}

#[wasm_bindgen(js_name = "isEncryptedStoragePayload")]
pub fn wasm_is_encrypted_storage_payload(value: JsValue) -> bool {
    from_js_value(value).is_ok_and(|v| is_encrypted_storage_payload(&v))
}
