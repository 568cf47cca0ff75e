//! Wire encoding of sealed credentials.
//!
//! A sealed credential travels as:
//!
//! ```text
//! base64( JSON {
//!     "identifier-ciphertext":  base64(IV ‖ tag ‖ ciphertext),
//!     "secret-ciphertext":      base64(IV ‖ tag ‖ ciphertext),
//!     "wrapped-key-ciphertext": base64(IV ‖ tag ‖ ciphertext),
//! } )
//! ```
//!
//! Both base64 layers use the standard padded alphabet. Decoding reverses
//! the layers strictly in order (outer base64, JSON, inner base64 per
//! value) and rejects any deviation. Object key order is irrelevant; fields
//! are looked up by name. Unknown keys are tolerated but their values must
//! still be non-empty base64.
//!
//! # Security
//!
//! Decoding is structural only. A successfully decoded [`SealedCredential`]
//! has not been authenticated; that happens in
//! [`CredentialSealer::deserialize`](crate::CredentialSealer::deserialize).

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// One of the three envelopes in a sealed credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Identifier encrypted under the surrogate key
    Identifier,
    /// Secret encrypted under the surrogate key
    Secret,
    /// Surrogate key encrypted under the master key
    WrappedKey,
}

impl Field {
    /// All fields, in canonical order.
    pub const ALL: [Self; 3] = [Self::Identifier, Self::Secret, Self::WrappedKey];

    /// Key used for this field in the JSON map.
    pub fn name(self) -> &'static str {
        match self {
            Self::Identifier => "identifier-ciphertext",
            Self::Secret => "secret-ciphertext",
            Self::WrappedKey => "wrapped-key-ciphertext",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reasons a wire string is structurally invalid.
///
/// None of these involve cryptography: they are detected before any
/// envelope is opened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireRejection {
    /// Input exceeds the configured wire length limit
    #[error("wire string too long: {length} bytes, limit {max}")]
    TooLong {
        /// Length of the rejected input
        length: usize,
        /// Configured limit
        max: usize,
    },

    /// Outer layer is not valid base64
    #[error("outer layer is not valid base64")]
    InvalidBase64,

    /// Outer layer decoded, but not to valid JSON
    #[error("payload is not valid JSON")]
    InvalidJson,

    /// JSON is valid but not an object
    #[error("payload is not a JSON object")]
    NotAnObject,

    /// JSON object has no entries
    #[error("payload is empty")]
    Empty,

    /// A required field is absent
    #[error("missing field: {field}")]
    MissingField {
        /// The absent field
        field: Field,
    },

    /// A value is not a JSON string
    #[error("value for {key:?} is not a string")]
    NonStringValue {
        /// Key holding the value
        key: String,
    },

    /// A value is not valid base64
    #[error("value for {key:?} is not valid base64")]
    InvalidValueBase64 {
        /// Key holding the value
        key: String,
    },

    /// A value decodes to zero bytes
    #[error("value for {key:?} is empty")]
    EmptyValue {
        /// Key holding the value
        key: String,
    },
}

/// The three raw envelopes of one sealed credential.
///
/// Produced by [`CredentialSealer::serialize`](crate::CredentialSealer::serialize)
/// and consumed by
/// [`CredentialSealer::deserialize`](crate::CredentialSealer::deserialize).
/// Each field holds `IV ‖ tag ‖ ciphertext` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedCredential {
    /// `identifier-ciphertext` envelope
    pub identifier: Vec<u8>,
    /// `secret-ciphertext` envelope
    pub secret: Vec<u8>,
    /// `wrapped-key-ciphertext` envelope
    pub wrapped_key: Vec<u8>,
}

#[derive(Serialize)]
struct WireMap {
    #[serde(rename = "identifier-ciphertext")]
    identifier: String,
    #[serde(rename = "secret-ciphertext")]
    secret: String,
    #[serde(rename = "wrapped-key-ciphertext")]
    wrapped_key: String,
}

impl SealedCredential {
    /// Envelope bytes for `field`.
    pub fn get(&self, field: Field) -> &[u8] {
        match field {
            Field::Identifier => &self.identifier,
            Field::Secret => &self.secret,
            Field::WrappedKey => &self.wrapped_key,
        }
    }

    /// Mutable envelope bytes for `field`.
    pub fn get_mut(&mut self, field: Field) -> &mut Vec<u8> {
        match field {
            Field::Identifier => &mut self.identifier,
            Field::Secret => &mut self.secret,
            Field::WrappedKey => &mut self.wrapped_key,
        }
    }

    /// Encode into the printable wire string.
    pub fn to_wire(&self) -> String {
        let map = WireMap {
            identifier: STANDARD.encode(&self.identifier),
            secret: STANDARD.encode(&self.secret),
            wrapped_key: STANDARD.encode(&self.wrapped_key),
        };

        // A struct of three strings always serializes
        let Ok(json) = serde_json::to_vec(&map) else {
            unreachable!("string-only map serializes infallibly");
        };

        STANDARD.encode(json)
    }

    /// Decode a wire string, enforcing structure only.
    ///
    /// # Errors
    ///
    /// Every structural problem maps to a [`WireRejection`]. Checks run in
    /// this order and the first failure wins:
    ///
    /// 1. `input.len() > max_len` (when a limit is set) -> `TooLong`
    /// 2. outer base64 -> `InvalidBase64`
    /// 3. JSON -> `InvalidJson`, `NotAnObject`
    /// 4. zero entries -> `Empty`
    /// 5. each of the three fields present -> `MissingField`
    /// 6. every value (unknown keys included) is a string of non-empty base64
    ///    -> `NonStringValue`, `InvalidValueBase64`, `EmptyValue`
    pub fn from_wire(input: &str, max_len: Option<usize>) -> Result<Self, WireRejection> {
        if let Some(max) = max_len.filter(|&max| input.len() > max) {
            return Err(WireRejection::TooLong { length: input.len(), max });
        }

        let json = STANDARD.decode(input).map_err(|_| WireRejection::InvalidBase64)?;
        let value: Value =
            serde_json::from_slice(&json).map_err(|_| WireRejection::InvalidJson)?;
        let Value::Object(map) = value else {
            return Err(WireRejection::NotAnObject);
        };

        if map.is_empty() {
            return Err(WireRejection::Empty);
        }

        for field in Field::ALL {
            if !map.contains_key(field.name()) {
                return Err(WireRejection::MissingField { field });
            }
        }

        let mut identifier = Vec::new();
        let mut secret = Vec::new();
        let mut wrapped_key = Vec::new();

        for (key, value) in &map {
            let Value::String(encoded) = value else {
                return Err(WireRejection::NonStringValue { key: key.clone() });
            };
            let decoded = STANDARD
                .decode(encoded)
                .map_err(|_| WireRejection::InvalidValueBase64 { key: key.clone() })?;
            if decoded.is_empty() {
                return Err(WireRejection::EmptyValue { key: key.clone() });
            }

            match key.as_str() {
                k if k == Field::Identifier.name() => identifier = decoded,
                k if k == Field::Secret.name() => secret = decoded,
                k if k == Field::WrappedKey.name() => wrapped_key = decoded,
                _ => {},
            }
        }

        Ok(Self { identifier, secret, wrapped_key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_of(json: &str) -> String {
        STANDARD.encode(json)
    }

    fn sample() -> SealedCredential {
        SealedCredential {
            identifier: vec![1; 50],
            secret: vec![2; 51],
            wrapped_key: vec![3; 80],
        }
    }

    #[test]
    fn wire_roundtrip() {
        let sealed = sample();
        let decoded = SealedCredential::from_wire(&sealed.to_wire(), None).unwrap();
        assert_eq!(decoded, sealed);
    }

    #[test]
    fn wire_json_has_three_named_string_values() {
        let wire = sample().to_wire();
        let json = STANDARD.decode(wire).unwrap();
        let value: Value = serde_json::from_slice(&json).unwrap();
        let map = value.as_object().unwrap();

        assert_eq!(map.len(), 3);
        for field in Field::ALL {
            let inner = map[field.name()].as_str().unwrap();
            assert_eq!(STANDARD.decode(inner).unwrap(), sample().get(field));
        }
    }

    #[test]
    fn key_order_is_irrelevant() {
        let v = STANDARD.encode([7u8; 48]);
        let json = format!(
            r#"{{"wrapped-key-ciphertext":"{v}","secret-ciphertext":"{v}","identifier-ciphertext":"{v}"}}"#
        );

        let decoded = SealedCredential::from_wire(&wire_of(&json), None).unwrap();

        assert_eq!(decoded.identifier, vec![7u8; 48]);
        assert_eq!(decoded.wrapped_key, vec![7u8; 48]);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let v = STANDARD.encode([7u8; 48]);
        let json = format!(
            r#"{{"identifier-ciphertext":"{v}","secret-ciphertext":"{v}","wrapped-key-ciphertext":"{v}","iv":"{v}"}}"#
        );

        assert!(SealedCredential::from_wire(&wire_of(&json), None).is_ok());
    }

    #[test]
    fn not_base64() {
        assert_eq!(SealedCredential::from_wire("foo", None), Err(WireRejection::InvalidBase64));
    }

    #[test]
    fn not_json() {
        let result = SealedCredential::from_wire(&wire_of("not json"), None);
        assert_eq!(result, Err(WireRejection::InvalidJson));
    }

    #[test]
    fn not_an_object() {
        for json in ["[]", "\"string\"", "42", "null", "[\"a\",\"b\",\"c\"]"] {
            let result = SealedCredential::from_wire(&wire_of(json), None);
            assert_eq!(result, Err(WireRejection::NotAnObject), "input {json}");
        }
    }

    #[test]
    fn empty_object() {
        let result = SealedCredential::from_wire(&wire_of("{}"), None);
        assert_eq!(result, Err(WireRejection::Empty));
    }

    #[test]
    fn missing_field() {
        let result = SealedCredential::from_wire(&wire_of(r#"{"foo":"bar"}"#), None);
        assert_eq!(result, Err(WireRejection::MissingField { field: Field::Identifier }));
    }

    #[test]
    fn empty_value() {
        let json = r#"{"identifier-ciphertext":"dXNlcm5hbWU=","secret-ciphertext":"cGFzc3dvcmQ=","wrapped-key-ciphertext":""}"#;

        let result = SealedCredential::from_wire(&wire_of(json), None);

        assert_eq!(
            result,
            Err(WireRejection::EmptyValue { key: "wrapped-key-ciphertext".to_string() })
        );
    }

    #[test]
    fn empty_value_under_unknown_key() {
        let v = STANDARD.encode([7u8; 48]);
        let json = format!(
            r#"{{"identifier-ciphertext":"{v}","secret-ciphertext":"{v}","wrapped-key-ciphertext":"{v}","extra":""}}"#
        );

        let result = SealedCredential::from_wire(&wire_of(&json), None);

        assert_eq!(result, Err(WireRejection::EmptyValue { key: "extra".to_string() }));
    }

    #[test]
    fn non_string_value() {
        let json = r#"{"identifier-ciphertext":1,"secret-ciphertext":"cGFzc3dvcmQ=","wrapped-key-ciphertext":"a2V5"}"#;

        let result = SealedCredential::from_wire(&wire_of(json), None);

        assert_eq!(
            result,
            Err(WireRejection::NonStringValue { key: "identifier-ciphertext".to_string() })
        );
    }

    #[test]
    fn invalid_inner_base64() {
        let json = r#"{"identifier-ciphertext":"!!!","secret-ciphertext":"cGFzc3dvcmQ=","wrapped-key-ciphertext":"a2V5"}"#;

        let result = SealedCredential::from_wire(&wire_of(json), None);

        assert_eq!(
            result,
            Err(WireRejection::InvalidValueBase64 { key: "identifier-ciphertext".to_string() })
        );
    }

    #[test]
    fn too_long_is_checked_first() {
        let result = SealedCredential::from_wire("foo", Some(2));
        assert_eq!(result, Err(WireRejection::TooLong { length: 3, max: 2 }));
    }

    #[test]
    fn field_names() {
        let names: Vec<_> = Field::ALL.iter().map(|f| f.to_string()).collect();
        assert_eq!(names, ["identifier-ciphertext", "secret-ciphertext", "wrapped-key-ciphertext"]);
    }

    #[test]
    fn rejection_display() {
        let err = WireRejection::MissingField { field: Field::WrappedKey };
        insta::assert_snapshot!(err.to_string(), @"missing field: wrapped-key-ciphertext");

        let err = WireRejection::EmptyValue { key: "secret-ciphertext".to_string() };
        insta::assert_snapshot!(err.to_string(), @r#"value for "secret-ciphertext" is empty"#);
    }
}
