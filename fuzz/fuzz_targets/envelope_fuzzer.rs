//! Fuzz target for the envelope cipher
//!
//! # Strategy
//!
//! - Arbitrary key seeds and plaintexts (empty, small, large)
//! - Arbitrary IVs
//! - Single-byte corruption at an arbitrary offset
//! - Decryption of raw arbitrary bytes
//!
//! # Invariants
//!
//! - Encrypt/decrypt roundtrip succeeds
//! - Envelope length is IV + tag + plaintext
//! - Corrupting any byte of the envelope fails authentication
//! - Arbitrary bytes never panic decrypt; short input is malformed

#![no_main]

use arbitrary::Arbitrary;
use credseal_crypto::{
    decrypt, encrypt, EnvelopeError, KeyMaterial, IV_SIZE, MIN_ENVELOPE_SIZE,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct EnvelopeScenario {
    /// Seed digested into the key
    seed: Vec<u8>,
    /// Plaintext to seal
    plaintext: Vec<u8>,
    /// IV for the envelope
    iv: [u8; IV_SIZE],
    /// Offset of the corrupted byte (reduced modulo the envelope length)
    corrupt_at: u16,
    /// XOR mask for the corrupted byte (zero skips corruption)
    corrupt_mask: u8,
    /// Raw bytes fed straight to decrypt
    raw: Vec<u8>,
}

fuzz_target!(|scenario: EnvelopeScenario| {
    let key = KeyMaterial::derive(&scenario.seed);

    // INVARIANT 1: Roundtrip succeeds
    let envelope = encrypt(&scenario.plaintext, &key, scenario.iv);
    assert_eq!(envelope.len(), MIN_ENVELOPE_SIZE + scenario.plaintext.len());
    let decrypted = decrypt(&envelope, &key);
    assert_eq!(decrypted.as_deref(), Ok(scenario.plaintext.as_slice()));

    // INVARIANT 2: Any corrupted byte fails authentication
    if scenario.corrupt_mask != 0 {
        let index = usize::from(scenario.corrupt_at) % envelope.len();
        let mut corrupted = envelope.clone();
        corrupted[index] ^= scenario.corrupt_mask;
        assert_eq!(decrypt(&corrupted, &key), Err(EnvelopeError::AuthenticationFailed));
    }

    // INVARIANT 3: Raw bytes never panic; short input is malformed
    match decrypt(&scenario.raw, &key) {
        Err(EnvelopeError::MalformedCiphertext { length, .. }) => {
            assert!(length < MIN_ENVELOPE_SIZE)
        },
        Err(_) => assert!(scenario.raw.len() >= MIN_ENVELOPE_SIZE),
        Ok(_) => {},
    }
});
