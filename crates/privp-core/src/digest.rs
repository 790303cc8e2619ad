//! # Digests
//!
//! SHA-256 digests used across privp. Context hashes are computed only from
//! [`CanonicalBytes`] through [`sha256_digest()`]. Transcript hashing that
//! mixes fixed-length binary fields goes through [`Sha256Accumulator`],
//! which always starts from a domain tag.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// A 32-byte SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest(#[serde(with = "crate::hex_bytes::array32")] [u8; 32]);

impl ContentDigest {
    /// Wrap raw digest bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute the SHA-256 digest of canonical bytes.
///
/// Accepts only `&CanonicalBytes` so that every context hash in the system
/// flows through the canonicalization pipeline.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    ContentDigest(Sha256::digest(data.as_bytes()).into())
}

/// Hex form of [`sha256_digest()`].
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}

/// Incremental SHA-256 over a domain tag followed by binary fields.
///
/// Variable-length fields should go through [`Sha256Accumulator::update_prefixed`]
/// so that field boundaries are unambiguous.
pub struct Sha256Accumulator {
    hasher: Sha256,
}

impl Sha256Accumulator {
    /// Start a new accumulation under `domain`.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Absorb raw bytes.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.hasher.update(data);
        self
    }

    /// Absorb bytes preceded by their length as a big-endian u64.
    pub fn update_prefixed(&mut self, data: &[u8]) -> &mut Self {
        self.hasher.update((data.len() as u64).to_be_bytes());
        self.hasher.update(data);
        self
    }

    /// Finish and return the digest.
    pub fn finalize(self) -> ContentDigest {
        ContentDigest(self.hasher.finalize().into())
    }

    /// Finish and return the lowercase hex digest.
    pub fn finalize_hex(self) -> String {
        self.finalize().to_hex()
    }
}
