//! # Proof Records
//!
//! [`ZKProof`] is the transmissible output of every proof backend. It is a
//! plain data record: backends fill it, verifiers read it, and transport
//! treats it as opaque bytes via [`ZKProof::serialize`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PrivpError;
use crate::temporal::Timestamp;

/// Well-known [`PublicInputs`] keys.
pub mod keys {
    /// Statement version.
    pub const VERSION: &str = "v";
    /// Curve identifier.
    pub const CURVE: &str = "curve";
    /// Anonymity-set size hint copied from the context.
    pub const ANONYMITY_SET_SIZE: &str = "anonymity_set_size";
    /// Hex SHA-256 of the context's canonical bytes.
    pub const CTX_HASH: &str = "ctx_hash";
    /// Hex encoding of the sigma protocol's ephemeral point.
    pub const EPHEMERAL: &str = "A";
    /// Marks a proof that only asserts knowledge of an opening.
    pub const CLAIM_ONLY: &str = "claim_only";
    /// Marks a placeholder proof.
    pub const MOCK: &str = "mock";
    /// Human-readable claim carried by placeholder proofs.
    pub const CLAIM: &str = "claim";
}

/// Proof family tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofType {
    AnonymitySetMembership,
    SessionUnlinkability,
    RangeProof,
    EqualityProof,
    TimingIndependence,
}

impl ProofType {
    /// All proof families.
    pub const ALL: [ProofType; 5] = [
        ProofType::AnonymitySetMembership,
        ProofType::SessionUnlinkability,
        ProofType::RangeProof,
        ProofType::EqualityProof,
        ProofType::TimingIndependence,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnonymitySetMembership => "anonymity_set_membership",
            Self::SessionUnlinkability => "session_unlinkability",
            Self::RangeProof => "range_proof",
            Self::EqualityProof => "equality_proof",
            Self::TimingIndependence => "timing_independence",
        }
    }
}

impl fmt::Display for ProofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProofType {
    type Err = PrivpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PrivpError::UnknownProofType(s.to_string()))
    }
}

/// Public statement values attached to a proof.
///
/// Byte-valued entries are stored as lowercase hex strings so the record
/// stays valid JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicInputs(BTreeMap<String, Value>);

impl PublicInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Insert bytes as hex.
    pub fn insert_bytes(&mut self, key: impl Into<String>, bytes: &[u8]) -> Option<Value> {
        self.insert(key, hex::encode(bytes))
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Hex-decoded bytes, or `None` if absent, not a string, or not
    /// lowercase hex.
    pub fn bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.str(key).and_then(|s| crate::hex_bytes::decode_lower(s).ok())
    }

    pub fn u64(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    /// Boolean value; a non-boolean counts as absent.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for PublicInputs {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A non-interactive proof record.
///
/// Field lengths depend on the producing backend. For the Pedersen backend:
/// `commitment` is a 33-byte compressed point, `challenge` a 32-byte scalar,
/// and `response` the 64-byte concatenation `z_v || z_b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZKProof {
    pub proof_type: ProofType,
    #[serde(with = "crate::hex_bytes")]
    pub commitment: Vec<u8>,
    #[serde(with = "crate::hex_bytes")]
    pub challenge: Vec<u8>,
    #[serde(with = "crate::hex_bytes")]
    pub response: Vec<u8>,
    #[serde(default)]
    pub public_inputs: PublicInputs,
    pub timestamp: Timestamp,
}

impl ZKProof {
    /// Lossless JSON encoding for transport.
    pub fn serialize(&self) -> Result<Vec<u8>, PrivpError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Inverse of [`Self::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self, PrivpError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
