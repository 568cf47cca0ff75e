//! Envelope encryption using AES-256-CTR with an HMAC-SHA256 tag
//!
//! All functions are pure - the IV must be provided by the caller.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{error::EnvelopeError, key::KeyMaterial};

type Aes256Ctr = ctr::Ctr128BE<Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// Size of the AES-CTR initial counter block (16 bytes)
pub const IV_SIZE: usize = 16;

/// HMAC-SHA256 tag size (32 bytes)
pub const TAG_SIZE: usize = 32;

/// Smallest well-formed envelope: IV and tag around an empty ciphertext
pub const MIN_ENVELOPE_SIZE: usize = IV_SIZE + TAG_SIZE;

/// Encrypt `plaintext` into a self-contained envelope.
///
/// Returns `IV ‖ tag ‖ ciphertext`, where the ciphertext has the same length
/// as the plaintext.
///
/// # Security
///
/// - Caller MUST provide a fresh, cryptographically random IV for every call
///   under the same key. CTR mode leaks the XOR of two plaintexts whose IVs
///   collide.
/// - The tag is computed over `IV ‖ ciphertext`, so the IV cannot be
///   altered without detection
pub fn encrypt(plaintext: &[u8], key: &KeyMaterial, iv: [u8; IV_SIZE]) -> Vec<u8> {
    let mut envelope = Vec::with_capacity(MIN_ENVELOPE_SIZE + plaintext.len());
    envelope.extend_from_slice(&iv);
    envelope.extend_from_slice(&[0u8; TAG_SIZE]);
    envelope.extend_from_slice(plaintext);

    let mut cipher = Aes256Ctr::new(key.as_bytes().into(), &iv.into());
    cipher.apply_keystream(&mut envelope[MIN_ENVELOPE_SIZE..]);

    let tag = compute_tag(key, &iv, &envelope[MIN_ENVELOPE_SIZE..]);
    envelope[IV_SIZE..MIN_ENVELOPE_SIZE].copy_from_slice(&tag);

    envelope
}

/// Open an envelope produced by [`encrypt`].
///
/// Returns the decrypted plaintext.
///
/// # Errors
///
/// - `MalformedCiphertext`: envelope shorter than [`MIN_ENVELOPE_SIZE`].
///   Checked before any MAC work.
/// - `AuthenticationFailed`: tag mismatch (tampering or wrong key). Nothing
///   is decrypted.
pub fn decrypt(envelope: &[u8], key: &KeyMaterial) -> Result<Vec<u8>, EnvelopeError> {
    if envelope.len() < MIN_ENVELOPE_SIZE {
        return Err(EnvelopeError::MalformedCiphertext {
            length: envelope.len(),
            minimum: MIN_ENVELOPE_SIZE,
        });
    }

    let (iv, rest) = envelope.split_at(IV_SIZE);
    let (tag, ciphertext) = rest.split_at(TAG_SIZE);

    let mut mac = new_mac(key);
    mac.update(iv);
    mac.update(ciphertext);
    mac.verify_slice(tag).map_err(|_| EnvelopeError::AuthenticationFailed)?;

    let mut iv_block = [0u8; IV_SIZE];
    iv_block.copy_from_slice(iv);

    let mut plaintext = ciphertext.to_vec();
    let mut cipher = Aes256Ctr::new(key.as_bytes().into(), &iv_block.into());
    cipher.apply_keystream(&mut plaintext);

    Ok(plaintext)
}

fn compute_tag(key: &KeyMaterial, iv: &[u8], ciphertext: &[u8]) -> [u8; TAG_SIZE] {
    let mut mac = new_mac(key);
    mac.update(iv);
    mac.update(ciphertext);

    let mut tag = [0u8; TAG_SIZE];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    tag
}

fn new_mac(key: &KeyMaterial) -> HmacSha256 {
    let Ok(mac) = HmacSha256::new_from_slice(key.as_bytes()) else {
        unreachable!("HMAC-SHA256 accepts any key size");
    };
    mac
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key(byte: u8) -> KeyMaterial {
        KeyMaterial::from_slice(&[byte; 32]).unwrap()
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let key = test_key(1);
        let plaintext = b"username-value";

        let envelope = encrypt(plaintext, &key, [0xAB; IV_SIZE]);
        let decrypted = decrypt(&envelope, &key).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn encrypt_decrypt_empty_plaintext() {
        let key = test_key(1);

        let envelope = encrypt(b"", &key, [0x00; IV_SIZE]);
        assert_eq!(envelope.len(), MIN_ENVELOPE_SIZE);

        let decrypted = decrypt(&envelope, &key).unwrap();
        assert!(decrypted.is_empty());
    }

    #[test]
    fn encrypt_decrypt_large_plaintext() {
        let key = test_key(7);
        let plaintext = vec![0x42u8; 64 * 1024]; // 64KB

        let envelope = encrypt(&plaintext, &key, [0xFF; IV_SIZE]);
        let decrypted = decrypt(&envelope, &key).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn ciphertext_length_matches_plaintext() {
        let key = test_key(1);
        let plaintext = b"password-value!";

        let envelope = encrypt(plaintext, &key, [0x00; IV_SIZE]);

        assert_eq!(envelope.len(), MIN_ENVELOPE_SIZE + plaintext.len());
    }

    #[test]
    fn envelope_layout() {
        let key = test_key(3);
        let iv = [0x5A; IV_SIZE];
        let plaintext = b"secret";

        let envelope = encrypt(plaintext, &key, iv);

        assert_eq!(&envelope[..IV_SIZE], &iv, "IV must lead the envelope");
        let ciphertext = &envelope[MIN_ENVELOPE_SIZE..];
        assert_ne!(ciphertext, plaintext, "ciphertext must not equal plaintext");
        assert_eq!(&envelope[IV_SIZE..MIN_ENVELOPE_SIZE], &compute_tag(&key, &iv, ciphertext));
    }

    #[test]
    fn deterministic_for_fixed_iv() {
        let key = test_key(9);
        let a = encrypt(b"same", &key, [0x11; IV_SIZE]);
        let b = encrypt(b"same", &key, [0x11; IV_SIZE]);
        assert_eq!(a, b);
    }

    #[test]
    fn different_iv_produces_different_ciphertext() {
        let key = test_key(0);

        let a = encrypt(b"test", &key, [0x00; IV_SIZE]);
        let b = encrypt(b"test", &key, [0xFF; IV_SIZE]);

        assert_ne!(a[MIN_ENVELOPE_SIZE..], b[MIN_ENVELOPE_SIZE..]);
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let envelope = encrypt(b"secret message", &test_key(0), [0x00; IV_SIZE]);

        let result = decrypt(&envelope, &test_key(1));

        assert_eq!(result, Err(EnvelopeError::AuthenticationFailed));
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let key = test_key(0);
        let mut envelope = encrypt(b"original message", &key, [0x00; IV_SIZE]);

        envelope[MIN_ENVELOPE_SIZE] ^= 0xFF;

        assert_eq!(decrypt(&envelope, &key), Err(EnvelopeError::AuthenticationFailed));
    }

    #[test]
    fn tampered_iv_fails_authentication() {
        let key = test_key(0);
        let envelope = encrypt(b"original message", &key, [0x00; IV_SIZE]);

        for index in 0..IV_SIZE {
            let mut tampered = envelope.clone();
            tampered[index] ^= 0x01;
            assert_eq!(
                decrypt(&tampered, &key),
                Err(EnvelopeError::AuthenticationFailed),
                "flipping IV byte {index} must fail authentication"
            );
        }
    }

    #[test]
    fn tag_depends_on_iv() {
        let key = test_key(3);
        let ciphertext = [0x42u8; 8];

        assert_ne!(
            compute_tag(&key, &[0x00; IV_SIZE], &ciphertext),
            compute_tag(&key, &[0x01; IV_SIZE], &ciphertext)
        );
    }

    #[test]
    fn tampered_tag_fails_authentication() {
        let key = test_key(0);
        let envelope = encrypt(b"original message", &key, [0x00; IV_SIZE]);

        for index in IV_SIZE..MIN_ENVELOPE_SIZE {
            let mut tampered = envelope.clone();
            tampered[index] ^= 0x01;
            assert_eq!(
                decrypt(&tampered, &key),
                Err(EnvelopeError::AuthenticationFailed),
                "flipping tag byte {index} must fail authentication"
            );
        }
    }

    #[test]
    fn truncated_ciphertext_fails_authentication() {
        let key = test_key(0);
        let envelope = encrypt(b"original message", &key, [0x00; IV_SIZE]);

        let result = decrypt(&envelope[..envelope.len() - 1], &key);

        assert_eq!(result, Err(EnvelopeError::AuthenticationFailed));
    }

    #[test]
    fn short_envelope_is_malformed() {
        let key = test_key(0);

        for length in [0, 1, IV_SIZE, MIN_ENVELOPE_SIZE - 1] {
            let result = decrypt(&vec![0u8; length], &key);
            assert_eq!(
                result,
                Err(EnvelopeError::MalformedCiphertext { length, minimum: MIN_ENVELOPE_SIZE })
            );
        }
    }

    #[test]
    fn header_only_envelope_with_bad_tag_fails_authentication() {
        let key = test_key(0);

        let result = decrypt(&[0u8; MIN_ENVELOPE_SIZE], &key);

        assert_eq!(result, Err(EnvelopeError::AuthenticationFailed));
    }
}
