use thiserror::Error;

/// Failures of the password encryption envelope.
///
/// Every decrypt failure past structural recognition is reported as
/// [`EnvelopeError::DecryptFailed`]; a wrong password and a corrupted file
/// are indistinguishable to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("Encryption is not supported in this runtime")]
    CryptoUnsupported,

    #[error("Invalid encryption envelope")]
    InvalidEnvelope,

    #[error("Decryption failed")]
    DecryptFailed,
}

impl EnvelopeError {
    /// Stable machine-readable code for UI branching.
    pub fn code(&self) -> &'static str {
        match self {
            EnvelopeError::CryptoUnsupported => "crypto_unsupported",
            EnvelopeError::InvalidEnvelope => "invalid_envelope",
            EnvelopeError::DecryptFailed => "decrypt_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(EnvelopeError::CryptoUnsupported.code(), "crypto_unsupported");
        assert_eq!(EnvelopeError::InvalidEnvelope.code(), "invalid_envelope");
        assert_eq!(EnvelopeError::DecryptFailed.code(), "decrypt_failed");
    }

    #[test]
    fn display_does_not_leak_cause() {
        assert_eq!(EnvelopeError::DecryptFailed.to_string(), "Decryption failed");
    }
}
