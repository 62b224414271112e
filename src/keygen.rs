//! API key generation.
//!
//! A key is 16 characters drawn uniformly from `0-9A-F`.  The generator is
//! a seeded PRNG; the seed is one hardware entropy reading taken when the
//! provisioning portal starts.

use core::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::app::ports::EntropyPort;

pub const API_KEY_LEN: usize = 16;

const HEX_ALPHABET: &[u8; 16] = b"0123456789ABCDEF";

/// A validated 16-character uppercase hex token.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(heapless::String<API_KEY_LEN>);

impl ApiKey {
    /// Accept `s` only if it has the exact key shape.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != API_KEY_LEN || !s.bytes().all(|b| HEX_ALPHABET.contains(&b)) {
            return None;
        }
        let mut inner = heapless::String::new();
        inner.push_str(s).ok()?;
        Some(Self(inner))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Last four characters, for logs.
    pub fn hint(&self) -> String {
        format!("****{}", &self.0.as_str()[API_KEY_LEN - 4..])
    }
}

// Never print the full key through `{:?}`.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self.hint())
    }
}

pub struct ApiKeyGenerator {
    rng: StdRng,
}

impl ApiKeyGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from one hardware entropy reading.
    pub fn from_entropy(source: &mut impl EntropyPort) -> Self {
        Self::seeded(source.entropy_u64())
    }

    pub fn generate(&mut self) -> ApiKey {
        let mut key = heapless::String::<API_KEY_LEN>::new();
        for _ in 0..API_KEY_LEN {
            let nibble = self.rng.gen_range(0..HEX_ALPHABET.len());
            // Capacity is exactly API_KEY_LEN.
            let _ = key.push(HEX_ALPHABET[nibble] as char);
        }
        ApiKey(key)
    }
}
