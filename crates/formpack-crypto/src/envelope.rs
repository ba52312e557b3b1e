//! Password-based encryption envelope for JSON exports.
//!
//! Key: PBKDF2-HMAC-SHA-256(password, salt, iterations) -> 256-bit AES key.
//! Cipher: AES-256-GCM with a 96-bit IV and 128-bit tag.
//!
//! Salt and IV are drawn fresh for every encryption. The iteration count is
//! stored per envelope and read back on decrypt. Derived keys are never
//! cached across calls.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use pbkdf2::pbkdf2_hmac;
use serde_json::Value;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::base64url::{base64url_decode, base64url_decode_array, base64url_encode};
use crate::error::EnvelopeError;
use crate::types::{
    JsonEncryptionEnvelope, CIPHER, DEFAULT_ITERATIONS, ENVELOPE_KIND, ENVELOPE_VERSION, IV_LENGTH,
    KDF, KDF_HASH, KEY_LENGTH, SALT_LENGTH, SUPPORTED_ENVELOPE_VERSIONS, TAG_LENGTH,
    TAG_LENGTH_BITS,
};

const BYTE_ORDER_MARK: char = '\u{feff}';

// ---------------------------------------------------------------------------
// Recognition
// ---------------------------------------------------------------------------

/// Structural predicate: true iff `value` is an object carrying every
/// envelope field with its exact expected value or type.
///
/// Unknown extra fields do not affect recognition.
pub fn is_json_encryption_envelope(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };

    let has_str =
        |field: &str, expected: &str| obj.get(field).and_then(Value::as_str) == Some(expected);
    let has_bytes =
        |field: &str| matches!(obj.get(field).and_then(Value::as_str), Some(s) if !s.is_empty());

    let version_ok = obj
        .get("version")
        .and_then(Value::as_u64)
        .is_some_and(|v| SUPPORTED_ENVELOPE_VERSIONS.iter().any(|s| u64::from(*s) == v));
    let tag_ok = obj.get("tagLength").and_then(Value::as_u64) == Some(u64::from(TAG_LENGTH_BITS));
    let iterations_ok = obj
        .get("iterations")
        .and_then(Value::as_u64)
        .is_some_and(|n| n > 0 && n <= u64::from(u32::MAX));

    has_str("kind", ENVELOPE_KIND)
        && version_ok
        && has_str("cipher", CIPHER)
        && tag_ok
        && has_str("kdf", KDF)
        && has_str("hash", KDF_HASH)
        && iterations_ok
        && has_bytes("salt")
        && has_bytes("iv")
        && has_bytes("ciphertext")
}

impl JsonEncryptionEnvelope {
    /// Convert a JSON value into an envelope if it passes recognition.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !is_json_encryption_envelope(value) {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

/// Non-throwing probe: does this file content look like an encrypted export?
///
/// Used to decide whether to prompt for a password before importing.
pub fn try_parse_json_encryption_envelope(raw: &str) -> Option<JsonEncryptionEnvelope> {
    let text = raw.strip_prefix(BYTE_ORDER_MARK).unwrap_or(raw).trim();
    if text.is_empty() {
        return None;
    }
    let value: Value = serde_json::from_str(text).ok()?;
    JsonEncryptionEnvelope::from_value(&value)
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; KEY_LENGTH]> {
    let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, key.as_mut_slice());
    key
}

fn random_bytes<const N: usize>() -> Result<[u8; N], EnvelopeError> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf).map_err(|e| {
        tracing::debug!(error = %e, "secure random source unavailable");
        EnvelopeError::CryptoUnsupported
    })?;
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Encrypt / decrypt
// ---------------------------------------------------------------------------

/// Encrypt a JSON string with a user password.
pub fn encrypt_json_with_password(
    plaintext: &str,
    password: &str,
) -> Result<JsonEncryptionEnvelope, EnvelopeError> {
    encrypt_with_iterations(plaintext, password, DEFAULT_ITERATIONS)
}

pub(crate) fn encrypt_with_iterations(
    plaintext: &str,
    password: &str,
    iterations: u32,
) -> Result<JsonEncryptionEnvelope, EnvelopeError> {
    let salt = random_bytes::<SALT_LENGTH>()?;
    let iv = random_bytes::<IV_LENGTH>()?;
    tracing::debug!(iterations, "encrypting export");

    let key = derive_key(password, &salt, iterations);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
        .map_err(|_| EnvelopeError::CryptoUnsupported)?;

    Ok(JsonEncryptionEnvelope {
        kind: ENVELOPE_KIND.to_string(),
        version: ENVELOPE_VERSION,
        cipher: CIPHER.to_string(),
        tag_length: TAG_LENGTH_BITS,
        kdf: KDF.to_string(),
        hash: KDF_HASH.to_string(),
        iterations,
        salt: base64url_encode(&salt),
        iv: base64url_encode(&iv),
        ciphertext: base64url_encode(&ciphertext),
    })
}

/// Decrypt an envelope back into the exact JSON string that was encrypted.
///
/// Wrong password, corrupted ciphertext and tampered parameters all yield
/// [`EnvelopeError::DecryptFailed`].
///
/// Key derivation cost follows `envelope.iterations`, which is taken from the
/// file as-is.
pub fn decrypt_json_with_password(
    envelope: &JsonEncryptionEnvelope,
    password: &str,
) -> Result<String, EnvelopeError> {
    if !envelope.is_well_formed() {
        return Err(EnvelopeError::InvalidEnvelope);
    }
    tracing::debug!(
        version = envelope.version,
        iterations = envelope.iterations,
        "decrypting export"
    );

    let salt = base64url_decode_array::<SALT_LENGTH>(&envelope.salt)
        .ok_or(EnvelopeError::DecryptFailed)?;
    let iv =
        base64url_decode_array::<IV_LENGTH>(&envelope.iv).ok_or(EnvelopeError::DecryptFailed)?;
    let ciphertext =
        base64url_decode(&envelope.ciphertext).map_err(|_| EnvelopeError::DecryptFailed)?;
    if ciphertext.len() < TAG_LENGTH {
        return Err(EnvelopeError::DecryptFailed);
    }

    let key = derive_key(password, &salt, envelope.iterations);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&iv), ciphertext.as_slice())
        .map_err(|_| EnvelopeError::DecryptFailed)?;

    String::from_utf8(plaintext).map_err(|_| EnvelopeError::DecryptFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FAST_ITERATIONS: u32 = 1_000;

    fn seal(plaintext: &str, password: &str) -> JsonEncryptionEnvelope {
        encrypt_with_iterations(plaintext, password, FAST_ITERATIONS).unwrap()
    }

    fn envelope_json() -> Value {
        serde_json::to_value(seal("{}", "pw")).unwrap()
    }

    #[test]
    fn pbkdf2_sha256_known_vector() {
        // RFC 7914 section 11, first 32 bytes.
        let key = derive_key("passwd", b"salt", 1);
        assert_eq!(
            hex::encode(key.as_slice()),
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"
        );
    }

    #[test]
    fn round_trip() {
        let plaintext = r#"{"record":{"data":{"name":"Ann"}}}"#;
        let envelope = seal(plaintext, "correct horse");
        assert_eq!(
            decrypt_json_with_password(&envelope, "correct horse").unwrap(),
            plaintext
        );
    }

    #[test]
    fn round_trip_unicode_and_empty() {
        for plaintext in ["", "Grüße, 日本語, emoji 🙂", "  whitespace kept  "] {
            let envelope = seal(plaintext, "pässwörd");
            assert_eq!(
                decrypt_json_with_password(&envelope, "pässwörd").unwrap(),
                plaintext
            );
        }
    }

    #[test]
    fn default_iterations_round_trip() {
        let envelope = encrypt_json_with_password("{\"a\":1}", "pw").unwrap();
        assert_eq!(envelope.iterations, DEFAULT_ITERATIONS);
        assert_eq!(
            decrypt_json_with_password(&envelope, "pw").unwrap(),
            "{\"a\":1}"
        );
    }

    #[test]
    fn wrong_password_fails() {
        let envelope = seal("secret", "right");
        assert_eq!(
            decrypt_json_with_password(&envelope, "wrong"),
            Err(EnvelopeError::DecryptFailed)
        );
        assert_eq!(
            decrypt_json_with_password(&envelope, ""),
            Err(EnvelopeError::DecryptFailed)
        );
    }

    #[test]
    fn fresh_salt_and_iv_per_call() {
        let a = seal("same", "same");
        let b = seal("same", "same");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn stamps_fixed_parameters() {
        let envelope = seal("x", "pw");
        assert_eq!(envelope.kind, ENVELOPE_KIND);
        assert_eq!(envelope.version, 1);
        assert_eq!(envelope.cipher, "AES-GCM");
        assert_eq!(envelope.tag_length, 128);
        assert_eq!(envelope.kdf, "PBKDF2");
        assert_eq!(envelope.hash, "SHA-256");
        assert_eq!(base64url_decode(&envelope.salt).unwrap().len(), SALT_LENGTH);
        assert_eq!(base64url_decode(&envelope.iv).unwrap().len(), IV_LENGTH);
        // 1 byte plaintext + 16 byte tag
        assert_eq!(base64url_decode(&envelope.ciphertext).unwrap().len(), 17);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let value = envelope_json();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 10);
        assert_eq!(obj["tagLength"], json!(128));
        assert!(obj.contains_key("ciphertext"));
        assert!(!obj.contains_key("tag_length"));
    }

    #[test]
    fn decrypt_uses_stored_iterations() {
        let mut envelope = seal("payload", "pw");
        assert_eq!(decrypt_json_with_password(&envelope, "pw").unwrap(), "payload");

        envelope.iterations = FAST_ITERATIONS + 1;
        assert_eq!(
            decrypt_json_with_password(&envelope, "pw"),
            Err(EnvelopeError::DecryptFailed)
        );
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let mut envelope = seal("payload", "pw");
        let mut bytes = base64url_decode(&envelope.ciphertext).unwrap();
        bytes[0] ^= 0x01;
        envelope.ciphertext = base64url_encode(&bytes);
        assert_eq!(
            decrypt_json_with_password(&envelope, "pw"),
            Err(EnvelopeError::DecryptFailed)
        );
    }

    #[test]
    fn short_iv_or_truncated_tag_fails() {
        let mut short_iv = seal("payload", "pw");
        short_iv.iv = base64url_encode(&[0u8; 8]);
        assert_eq!(
            decrypt_json_with_password(&short_iv, "pw"),
            Err(EnvelopeError::DecryptFailed)
        );

        let mut truncated = seal("payload", "pw");
        truncated.ciphertext = base64url_encode(&[0u8; TAG_LENGTH - 1]);
        assert_eq!(
            decrypt_json_with_password(&truncated, "pw"),
            Err(EnvelopeError::DecryptFailed)
        );

        let mut bad_base64 = seal("payload", "pw");
        bad_base64.salt = "not base64url!".to_string();
        assert_eq!(
            decrypt_json_with_password(&bad_base64, "pw"),
            Err(EnvelopeError::DecryptFailed)
        );
    }

    #[test]
    fn malformed_envelope_is_rejected_before_crypto() {
        let mut wrong_cipher = seal("payload", "pw");
        wrong_cipher.cipher = "AES-CBC".to_string();
        assert_eq!(
            decrypt_json_with_password(&wrong_cipher, "pw"),
            Err(EnvelopeError::InvalidEnvelope)
        );

        let mut future = seal("payload", "pw");
        future.version = 2;
        assert_eq!(
            decrypt_json_with_password(&future, "pw"),
            Err(EnvelopeError::InvalidEnvelope)
        );

        let mut no_salt = seal("payload", "pw");
        no_salt.salt.clear();
        assert_eq!(
            decrypt_json_with_password(&no_salt, "pw"),
            Err(EnvelopeError::InvalidEnvelope)
        );
    }

    #[test]
    fn recognizes_envelopes() {
        assert!(is_json_encryption_envelope(&envelope_json()));

        let mut with_extra = envelope_json();
        with_extra["note"] = json!("ignored");
        assert!(is_json_encryption_envelope(&with_extra));
    }

    #[test]
    fn recognition_is_exclusive() {
        let plain_export = json!({
            "formpack": {"id": "x"},
            "record": {"locale": "de", "data": {"name": "Ann"}}
        });
        assert!(!is_json_encryption_envelope(&plain_export));
        assert!(!is_json_encryption_envelope(&json!(null)));
        assert!(!is_json_encryption_envelope(&json!([envelope_json()])));

        let overrides = [
            ("kind", json!("something-else")),
            ("version", json!(2)),
            ("version", json!("1")),
            ("version", json!(1.5)),
            ("cipher", json!("AES-CBC")),
            ("tagLength", json!(96)),
            ("kdf", json!("scrypt")),
            ("hash", json!("SHA-1")),
            ("iterations", json!(0)),
            ("iterations", json!(-5)),
            ("iterations", json!(u64::from(u32::MAX) + 1)),
            ("salt", json!("")),
            ("iv", json!(12)),
            ("ciphertext", json!(null)),
        ];
        for (field, bad) in overrides {
            let mut value = envelope_json();
            value[field] = bad.clone();
            assert!(
                !is_json_encryption_envelope(&value),
                "{field} = {bad} should not be recognized"
            );
        }

        let fields = [
            "kind",
            "version",
            "cipher",
            "tagLength",
            "kdf",
            "hash",
            "iterations",
            "salt",
            "iv",
            "ciphertext",
        ];
        for field in fields {
            let mut value = envelope_json();
            value.as_object_mut().unwrap().remove(field);
            assert!(!is_json_encryption_envelope(&value), "missing {field}");
        }
    }

    #[test]
    fn probe_parses_envelope_text() {
        let envelope = seal("payload", "pw");
        let text = serde_json::to_string(&envelope).unwrap();
        assert_eq!(try_parse_json_encryption_envelope(&text), Some(envelope.clone()));

        let with_bom = format!("\u{feff}\n{text}\n");
        assert_eq!(try_parse_json_encryption_envelope(&with_bom), Some(envelope));
    }

    #[test]
    fn probe_never_errors() {
        assert!(try_parse_json_encryption_envelope("").is_none());
        assert!(try_parse_json_encryption_envelope("   ").is_none());
        assert!(try_parse_json_encryption_envelope("{not json").is_none());
        assert!(try_parse_json_encryption_envelope(r#"{"formpack":{"id":"x"}}"#).is_none());
    }
}
