//! Fuzz target: `AuthGate::verify` (bearer header path)
//!
//! Invariants checked:
//! - No panics for any header bytes
//! - Only the exact `Bearer <key>` string authenticates
//! - An empty configured key rejects everything
//!
//! cargo fuzz run fuzz_auth_header

#![no_main]

use gatekeeper::http::auth::AuthGate;
use libfuzzer_sys::fuzz_target;

const KEY: &str = "0123456789ABCDEF";

fuzz_target!(|data: &[u8]| {
    let Ok(header) = core::str::from_utf8(data) else {
        return;
    };

    let gate = AuthGate::new(KEY);
    let accepted = gate.verify(Some(header)).is_ok();
    assert_eq!(accepted, header == "Bearer 0123456789ABCDEF");

    assert!(AuthGate::new("").verify(Some(header)).is_err());
});
