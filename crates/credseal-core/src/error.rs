//! Error types for sealing and opening credentials.
//!
//! Two failure tiers are kept apart on purpose:
//!
//! - Structural misses (bad base64, bad JSON, missing or empty fields) are
//!   described by [`WireRejection`](crate::WireRejection) and surface from
//!   [`deserialize_from_string`](crate::CredentialSealer::deserialize_from_string)
//!   as `Ok(None)`.
//! - Cryptographic failures are [`SealError`] and always reach the caller as
//!   `Err`, since they mean tampering or a wrong master key.

use credseal_crypto::EnvelopeError;
use thiserror::Error;

use crate::wire::Field;

/// Errors from opening a sealed credential
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SealError {
    /// One of the three envelopes failed to open
    #[error("{field}: {source}")]
    Envelope {
        /// Which envelope failed
        field: Field,
        /// Underlying cipher failure
        #[source]
        source: EnvelopeError,
    },

    /// An envelope authenticated but its plaintext is not UTF-8
    #[error("{field}: decrypted field is not valid UTF-8")]
    NonUtf8Field {
        /// Which field held invalid UTF-8
        field: Field,
    },
}

impl SealError {
    /// The cipher failure behind this error, if any.
    pub fn envelope_error(&self) -> Option<&EnvelopeError> {
        match self {
            Self::Envelope { source, .. } => Some(source),
            Self::NonUtf8Field { .. } => None,
        }
    }

    /// Field the failure was detected on.
    pub fn field(&self) -> Field {
        match self {
            Self::Envelope { field, .. } | Self::NonUtf8Field { field } => *field,
        }
    }

    /// Returns true if the input was forged, altered, or sealed under a
    /// different master key.
    ///
    /// Callers should log or alert on these rather than treat them as a
    /// plain "no credential" outcome.
    pub fn is_tampering(&self) -> bool {
        self.envelope_error().is_some_and(EnvelopeError::is_authentication_failure)
    }
}
