//! Credential sealing and opening.
//!
//! # Key Hierarchy
//!
//! ```text
//! master seed ──SHA-256──▶ master key
//!                              │
//!                              ▼ encrypt
//!                    wrapped-key-ciphertext
//!                              ▲
//! 32 random bytes ──SHA-256──▶ surrogate key (fresh per serialize)
//!                              │
//!                              ▼ encrypt
//!          identifier-ciphertext, secret-ciphertext
//! ```
//!
//! The surrogate key is a local value of each call and is never stored on
//! the sealer, so one sealer can serve any number of threads at once.

use std::fmt;

use credseal_crypto::{IV_SIZE, KEY_SIZE, KeyMaterial, decrypt, encrypt};

use crate::{
    config::SealerConfig,
    credential::Credential,
    entropy::{Entropy, SystemEntropy},
    error::SealError,
    wire::{Field, SealedCredential, WireRejection},
};

/// Characters stripped from both ends of opened fields: space, tab, line
/// feed, carriage return, NUL and vertical tab.
pub const TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Seals credentials into tamper-evident envelopes and opens them again.
///
/// Holds only the master key (immutable) plus configuration and an entropy
/// source. Two sealers built from the same seed interoperate.
///
/// # Invariants
///
/// - Binding: the wrapped key of a [`SealedCredential`] decrypts to the
///   surrogate key that encrypted its identifier and secret.
/// - Freshness: every `serialize` call draws a new surrogate key and a new IV
///   per envelope, so sealing the same credential twice never repeats
///   ciphertext.
pub struct CredentialSealer<E = SystemEntropy> {
    master_key: KeyMaterial,
    config: SealerConfig,
    entropy: E,
}

impl CredentialSealer<SystemEntropy> {
    /// Create a sealer from a master key seed with default configuration.
    pub fn new(master_seed: impl AsRef<[u8]>) -> Self {
        Self::with_config(master_seed, SealerConfig::default())
    }

    /// Create a sealer from a master key seed and explicit configuration.
    pub fn with_config(master_seed: impl AsRef<[u8]>, config: SealerConfig) -> Self {
        Self::with_entropy(master_seed, config, SystemEntropy::new())
    }
}

impl<E: Entropy> CredentialSealer<E> {
    /// Create a sealer with a custom entropy source.
    ///
    /// Tests use this to make envelopes reproducible. Production code should
    /// use [`CredentialSealer::new`].
    pub fn with_entropy(master_seed: impl AsRef<[u8]>, config: SealerConfig, entropy: E) -> Self {
        Self { master_key: KeyMaterial::derive(master_seed.as_ref()), config, entropy }
    }

    /// Seal a credential into its three raw envelopes.
    pub fn serialize(&self, credential: &Credential) -> SealedCredential {
        let surrogate = self.generate_surrogate_key();

        let sealed = SealedCredential {
            identifier: self.seal(credential.identifier().as_bytes(), &surrogate),
            secret: self.seal(credential.secret().as_bytes(), &surrogate),
            wrapped_key: self.seal(surrogate.as_bytes(), &self.master_key),
        };

        tracing::trace!(
            identifier_len = sealed.identifier.len(),
            secret_len = sealed.secret.len(),
            "sealed credential"
        );

        sealed
    }

    /// Seal a credential into a printable wire string.
    pub fn serialize_to_string(&self, credential: &Credential) -> String {
        self.serialize(credential).to_wire()
    }

    /// Open a sealed credential.
    ///
    /// The wrapped key is opened first; the recovered surrogate key then
    /// opens the identifier and the secret. Both recovered fields are trimmed
    /// of leading and trailing [`TRIM_CHARS`] characters; other Unicode
    /// whitespace such as U+00A0 is kept.
    ///
    /// # Errors
    ///
    /// - `Envelope { field, source }`: a cipher failure, unchanged from
    ///   [`credseal_crypto::decrypt`], tagged with the envelope it came from.
    ///   An unwrapped key of the wrong size reports `InvalidKeyLength` on
    ///   [`Field::WrappedKey`].
    /// - `NonUtf8Field`: an authenticated field whose plaintext is not UTF-8
    pub fn deserialize(&self, sealed: &SealedCredential) -> Result<Credential, SealError> {
        let surrogate_bytes = self.open(sealed, Field::WrappedKey, &self.master_key)?;
        let surrogate = KeyMaterial::from_slice(&surrogate_bytes)
            .map_err(|source| SealError::Envelope { field: Field::WrappedKey, source })?;

        let identifier = self.open_text(sealed, Field::Identifier, &surrogate)?;
        let secret = self.open_text(sealed, Field::Secret, &surrogate)?;

        tracing::trace!("opened credential");

        Ok(Credential::new(
            identifier.trim_matches(TRIM_CHARS),
            secret.trim_matches(TRIM_CHARS),
        ))
    }

    /// Structurally decode a wire string without opening any envelope.
    ///
    /// Applies the configured length limit. Useful when the caller wants the
    /// precise reason a string was rejected.
    pub fn decode_wire(&self, input: &str) -> Result<SealedCredential, WireRejection> {
        SealedCredential::from_wire(input, self.config.max_wire_len)
    }

    /// Open a credential from its wire string.
    ///
    /// Returns `Ok(None)` when the string is structurally invalid (see
    /// [`SealedCredential::from_wire`]); no cryptography runs in that case.
    /// The rejection reason is logged at `debug`.
    ///
    /// # Errors
    ///
    /// Any [`SealError`] from [`Self::deserialize`]. A structurally valid
    /// string whose envelopes fail to authenticate is an error, never
    /// `Ok(None)`.
    pub fn deserialize_from_string(&self, input: &str) -> Result<Option<Credential>, SealError> {
        let sealed = match self.decode_wire(input) {
            Ok(sealed) => sealed,
            Err(rejection) => {
                tracing::debug!(%rejection, "rejected credential wire string");
                return Ok(None);
            },
        };

        self.deserialize(&sealed).map(Some)
    }

    fn generate_surrogate_key(&self) -> KeyMaterial {
        let mut random = [0u8; KEY_SIZE];
        self.entropy.fill_bytes(&mut random);
        KeyMaterial::from_random(random)
    }

    fn seal(&self, plaintext: &[u8], key: &KeyMaterial) -> Vec<u8> {
        let mut iv = [0u8; IV_SIZE];
        self.entropy.fill_bytes(&mut iv);
        encrypt(plaintext, key, iv)
    }

    fn open(
        &self,
        sealed: &SealedCredential,
        field: Field,
        key: &KeyMaterial,
    ) -> Result<Vec<u8>, SealError> {
        decrypt(sealed.get(field), key).map_err(|source| {
            if source.is_authentication_failure() {
                tracing::warn!(%field, "credential envelope failed authentication");
            } else {
                tracing::debug!(%field, error = %source, "credential envelope malformed");
            }
            SealError::Envelope { field, source }
        })
    }

    fn open_text(
        &self,
        sealed: &SealedCredential,
        field: Field,
        key: &KeyMaterial,
    ) -> Result<String, SealError> {
        let plaintext = self.open(sealed, field, key)?;
        String::from_utf8(plaintext).map_err(|_| SealError::NonUtf8Field { field })
    }
}

impl<E> fmt::Debug for CredentialSealer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSealer")
            .field("master_key", &self.master_key)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
