//! Fuzz target: provisioning body parsing (`any_credentials`)
//!
//! The first byte picks the declared content type; the rest is the body.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Accepted credentials always satisfy the field bounds
//! - Rejections are always a 400
//!
//! cargo fuzz run fuzz_credentials_body

#![no_main]

use gatekeeper::http::Request;
use gatekeeper::http::form::any_credentials;
use libfuzzer_sys::fuzz_target;

const CONTENT_TYPES: [&str; 4] = [
    "application/json",
    "application/x-www-form-urlencoded",
    "text/plain",
    "",
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, body)) = data.split_first() else {
        return;
    };

    let mut req = Request::post("/config").with_body(body.to_vec());
    let ct = CONTENT_TYPES[usize::from(selector) % CONTENT_TYPES.len()];
    if !ct.is_empty() {
        req = req.with_header("Content-Type", ct);
    }

    match any_credentials(&req) {
        Ok(creds) => {
            assert!((1..=32).contains(&creds.ssid().len()));
            assert!(creds.ssid().bytes().all(|b| (0x20..0x7f).contains(&b)));
            assert!((1..=64).contains(&creds.password().len()));
        }
        Err(e) => assert_eq!(e.status(), 400),
    }
});
