use serde::{Deserialize, Serialize};

/// Discriminator stamped into every encrypted export.
pub const ENVELOPE_KIND: &str = "formpack-json-encrypted";

/// Envelope format version written by this build.
pub const ENVELOPE_VERSION: u32 = 1;

/// Envelope versions this build can decrypt.
pub const SUPPORTED_ENVELOPE_VERSIONS: &[u32] = &[1];

pub const CIPHER: &str = "AES-GCM";
pub const KDF: &str = "PBKDF2";
pub const KDF_HASH: &str = "SHA-256";

/// AES-GCM tag length in bits, as recorded in the envelope.
pub const TAG_LENGTH_BITS: u32 = 128;

/// AES-GCM tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// PBKDF2 salt length in bytes.
pub const SALT_LENGTH: usize = 16;

/// AES-GCM IV length in bytes (96 bits per NIST recommendation).
pub const IV_LENGTH: usize = 12;

/// AES key length in bytes (256 bits).
pub const KEY_LENGTH: usize = 32;

/// PBKDF2 iteration count used for new envelopes.
///
/// Tuned for interactive use. Decryption always uses the count stored in the
/// envelope, so raising this never breaks older files.
pub const DEFAULT_ITERATIONS: u32 = 310_000;

/// Password-encrypted export file.
///
/// The envelope carries no plaintext metadata about the record it protects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonEncryptionEnvelope {
    pub kind: String,
    pub version: u32,
    pub cipher: String,
    pub tag_length: u32,
    pub kdf: String,
    pub hash: String,
    pub iterations: u32,
    /// Base64url (unpadded) PBKDF2 salt.
    pub salt: String,
    /// Base64url (unpadded) AES-GCM IV.
    pub iv: String,
    /// Base64url (unpadded) AES-GCM output including the tag.
    pub ciphertext: String,
}

impl JsonEncryptionEnvelope {
    /// Whether every fixed field carries its expected value and every byte
    /// string is non-empty.
    pub fn is_well_formed(&self) -> bool {
        self.kind == ENVELOPE_KIND
            && SUPPORTED_ENVELOPE_VERSIONS.contains(&self.version)
            && self.cipher == CIPHER
            && self.tag_length == TAG_LENGTH_BITS
            && self.kdf == KDF
            && self.hash == KDF_HASH
            && self.iterations > 0
            && !self.salt.is_empty()
            && !self.iv.is_empty()
            && !self.ciphertext.is_empty()
    }
}
