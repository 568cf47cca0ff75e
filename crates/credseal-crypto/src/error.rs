//! Error types for envelope operations

use thiserror::Error;

/// Errors from opening an envelope or rebuilding key material
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// Envelope is too short to hold the IV and the authentication tag
    #[error("malformed ciphertext: {length} bytes, need at least {minimum}")]
    MalformedCiphertext {
        /// Length of the rejected envelope
        length: usize,
        /// Smallest well-formed envelope (IV + tag)
        minimum: usize,
    },

    /// Authentication tag does not match the ciphertext under this key
    #[error("authentication failed: envelope tag mismatch")]
    AuthenticationFailed,

    /// Key material has the wrong length
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length
        expected: usize,
        /// Actual key length
        actual: usize,
    },
}

impl EnvelopeError {
    /// Returns true if this error means the envelope was forged, altered, or
    /// opened with the wrong key.
    ///
    /// Length failures are structural: the bytes never looked like an
    /// envelope in the first place.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed)
    }
}
