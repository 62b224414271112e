//! Bearer-token access gate for the operational surface.
//!
//! The `Authorization` header must equal `"Bearer "` followed by the stored
//! API key, byte for byte.  The comparison runs through
//! `subtle::ConstantTimeEq` so response timing does not reveal how much of
//! a guess was right.

use core::fmt;

use log::warn;
use subtle::ConstantTimeEq;

use super::request::Request;
use crate::error::GateError;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Value of the `WWW-Authenticate` header on every 401.
pub const CHALLENGE: &str = r#"Bearer realm="gate""#;

pub struct AuthGate {
    expected: String,
}

impl AuthGate {
    pub fn new(api_key: &str) -> Self {
        let mut expected = String::with_capacity(BEARER_PREFIX.len() + api_key.len());
        expected.push_str(BEARER_PREFIX);
        expected.push_str(api_key);
        Self { expected }
    }

    /// Check a raw header value.
    pub fn verify(&self, header: Option<&str>) -> Result<(), GateError> {
        // An empty key would make "Bearer " a valid credential.
        if self.expected.len() == BEARER_PREFIX.len() {
            return Err(GateError::Authentication);
        }
        let Some(presented) = header else {
            return Err(GateError::Authentication);
        };
        if bool::from(presented.as_bytes().ct_eq(self.expected.as_bytes())) {
            Ok(())
        } else {
            Err(GateError::Authentication)
        }
    }

    pub fn check(&self, req: &Request) -> Result<(), GateError> {
        self.verify(req.header("Authorization")).inspect_err(|_| {
            warn!(
                "Auth: rejected {} {} ({})",
                req.method,
                req.path,
                if req.header("Authorization").is_some() { "bad credential" } else { "no credential" }
            );
        })
    }
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthGate(<redacted>)")
    }
}
