//! The credential record carried inside an envelope.

use std::fmt;

/// An identifier/secret pair (e.g. username and password).
///
/// Plain value type: two credentials are equal when both fields are equal.
/// `Debug` output never includes the secret.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential {
    identifier: String,
    secret: String,
}

impl Credential {
    /// Create a credential from its two fields.
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self { identifier: identifier.into(), secret: secret.into() }
    }

    /// The identifier (e.g. username).
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The secret (e.g. password).
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}
