//! Key material for the envelope cipher
//!
//! Every key, master or surrogate, is the SHA-256 digest of some input
//! bytes: the operator's seed for the master key, fresh random bytes for a
//! surrogate key. The digest fixes the length at [`KEY_SIZE`] regardless of
//! how long the input was.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::error::EnvelopeError;

/// Size of key material in bytes (AES-256 and HMAC-SHA256 key)
pub const KEY_SIZE: usize = 32;

/// 32 bytes of symmetric key material.
///
/// Used both as the AES-256-CTR key and as the HMAC-SHA256 key of an
/// envelope.
///
/// # Security
///
/// - Zeroized on drop
/// - `Debug` output never includes the key bytes
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    key: [u8; KEY_SIZE],
}

impl KeyMaterial {
    /// Digest arbitrary seed bytes into key material.
    ///
    /// Deterministic: two callers holding the same seed derive the same key,
    /// which is what lets separately constructed sealers interoperate.
    pub fn derive(seed: &[u8]) -> Self {
        let digest = Sha256::digest(seed);

        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Build a fresh key from caller-supplied random bytes.
    ///
    /// The random bytes pass through the same digest as [`Self::derive`].
    /// Callers MUST provide cryptographically secure random bytes in
    /// production.
    pub fn from_random(mut random: [u8; KEY_SIZE]) -> Self {
        let key = Self::derive(&random);
        random.zeroize();
        key
    }

    /// Rebuild key material from its raw bytes (e.g. after unwrapping).
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength` if `bytes` is not exactly [`KEY_SIZE`] long
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        if bytes.len() != KEY_SIZE {
            return Err(EnvelopeError::InvalidKeyLength { expected: KEY_SIZE, actual: bytes.len() });
        }

        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(bytes);
        Ok(Self { key })
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(<redacted>)")
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}
