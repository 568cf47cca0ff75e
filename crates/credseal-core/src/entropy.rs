//! Randomness source abstraction for deterministic testing.
//!
//! The sealer draws every IV and surrogate key through [`Entropy`]. Production
//! uses [`SystemEntropy`]; tests substitute fixed or counting sources so that
//! envelopes are reproducible.

/// Source of random bytes for IVs and surrogate keys.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `fill_bytes()` uses cryptographically secure entropy in production
/// - `fill_bytes()` is infallible; an implementation that cannot produce
///   entropy must panic rather than return predictable bytes
pub trait Entropy: Send + Sync {
    /// Fills the provided buffer with random bytes.
    fn fill_bytes(&self, buffer: &mut [u8]);
}

/// Production entropy from the operating system RNG.
///
/// # Security
///
/// Uses getrandom, which reads OS-level cryptographic randomness (e.g.
/// `getrandom(2)` on Linux, `BCryptGenRandom` on Windows).
///
/// # Panics
///
/// Panics if the OS RNG fails. A sealer without working randomness would
/// reuse IVs and surrogate keys, so continuing is never an option.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEntropy;

impl SystemEntropy {
    /// Create a new system entropy source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Entropy for SystemEntropy {
    #[allow(clippy::disallowed_methods)]
    #[allow(clippy::expect_used)]
    fn fill_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - sealer cannot operate securely");
    }
}

impl<E: Entropy + ?Sized> Entropy for &E {
    fn fill_bytes(&self, buffer: &mut [u8]) {
        (**self).fill_bytes(buffer);
    }
}
