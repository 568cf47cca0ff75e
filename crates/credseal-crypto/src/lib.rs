//! credseal Envelope Cipher
//!
//! Authenticated encryption of a single opaque byte string under a single
//! key. Pure functions: callers supply the IV and the random bytes behind
//! generated keys, which keeps every output reproducible under test.
//!
//! # Envelope Layout
//!
//! ```text
//! ┌──────────────┬──────────────────────┬──────────────────────────┐
//! │ IV (16)      │ HMAC-SHA256 tag (32) │ AES-256-CTR ciphertext   │
//! └──────────────┴──────────────────────┴──────────────────────────┘
//! ```
//!
//! The IV and tag are fixed width, so the envelope carries no length field.
//! The ciphertext has exactly the plaintext's length (stream mode, no
//! padding).
//!
//! # Security
//!
//! Authenticity:
//! - The tag covers `IV ‖ ciphertext` and is keyed by the encryption key
//! - Tags are compared in constant time
//! - Decryption only runs after the tag verifies
//!
//! Malformed input:
//! - Envelopes shorter than [`MIN_ENVELOPE_SIZE`] are rejected before any MAC
//!   work, with an error distinct from authentication failure
//!
//! Key hygiene:
//! - [`KeyMaterial`] is zeroized on drop and never printed by `Debug`

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod envelope;
pub mod error;
pub mod key;

pub use envelope::{IV_SIZE, MIN_ENVELOPE_SIZE, TAG_SIZE, decrypt, encrypt};
pub use error::EnvelopeError;
pub use key::{KEY_SIZE, KeyMaterial};
