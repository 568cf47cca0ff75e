//! Fuzz target for CredentialSealer::deserialize_from_string
//!
//! This fuzzer feeds arbitrary strings to the wire decoder to find:
//! - Parser crashes or panics in either base64 layer or the JSON layer
//! - Structurally invalid input that reaches the cipher
//! - Garbage that opens to a credential
//!
//! The fuzzer should NEVER panic. Invalid inputs return `Ok(None)`; inputs
//! that pass structural checks may return a cipher error.

#![no_main]

use credseal_core::CredentialSealer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    let sealer = CredentialSealer::new("fuzz");

    match sealer.deserialize_from_string(input) {
        Ok(None) => assert!(sealer.decode_wire(input).is_err()),
        Ok(Some(_)) => panic!("unsealed input opened to a credential"),
        Err(_) => assert!(sealer.decode_wire(input).is_ok()),
    }
});
