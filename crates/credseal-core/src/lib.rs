//! credseal: tamper-evident credential envelopes
//!
//! Turns an identifier/secret pair into an opaque printable string that can
//! cross an untrusted channel (cookie, cache entry, query parameter) and
//! back. Without the master key the string can neither be read nor forged.
//!
//! # Example
//!
//! ```
//! use credseal_core::{Credential, CredentialSealer};
//!
//! let sealer = CredentialSealer::new("master key seed");
//! let credential = Credential::new("username-value", "password-value");
//!
//! let wire = sealer.serialize_to_string(&credential);
//! let opened = sealer.deserialize_from_string(&wire)?;
//!
//! assert_eq!(opened, Some(credential));
//! assert_eq!(sealer.deserialize_from_string("foo")?, None);
//! # Ok::<(), credseal_core::SealError>(())
//! ```
//!
//! # Outcomes
//!
//! Opening a wire string has three outcomes:
//!
//! - `Ok(Some(credential))`: the string decoded and authenticated
//! - `Ok(None)`: the string is structurally invalid; nothing was decrypted
//! - `Err(SealError)`: the string is well formed but an envelope failed to
//!   open. [`SealError::is_tampering`] distinguishes forged input and wrong
//!   master keys from malformed envelopes.
//!
//! # Concurrency
//!
//! A [`CredentialSealer`] holds no per-operation state. Share it behind an
//! `Arc` and call it from any number of threads.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod credential;
pub mod entropy;
pub mod error;
pub mod sealer;
pub mod wire;

pub use config::SealerConfig;
pub use credential::Credential;
pub use credseal_crypto::EnvelopeError;
pub use entropy::{Entropy, SystemEntropy};
pub use error::SealError;
pub use sealer::{CredentialSealer, TRIM_CHARS};
pub use wire::{Field, SealedCredential, WireRejection};
