//! # Mock Proof System
//!
//! An illustrative placeholder for proof families that have no real backend
//! (anonymity-set membership, session unlinkability, range, timing). Its
//! "proofs" are SHA-256 hashes with **no soundness and no zero knowledge**.
//!
//! - [`MockZkProofSystem`] produces and checks [`MockProof`] records.
//! - [`MockAdapter`] puts the system behind [`ProofBackend`], encoding mock
//!   proofs into [`ZKProof`] records that carry `mock: true`.
//!
//! The production [`ProofPolicy`](crate::policy::ProofPolicy) refuses this
//! backend.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use privp_core::{
    keys, CanonicalBytes, CanonicalizationError, ContentDigest, ProofContext, ProofType,
    PublicInputs, Timestamp, ZKProof,
};
use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::traits::{
    choice, expected_inputs_match, BackendInfo, ProofBackend, ProofError, Witness,
};

/// Backend name.
pub const MOCK_BACKEND_NAME: &str = "mock-sha256";

/// Proof format version.
pub const MOCK_BACKEND_VERSION: &str = "0.1.0";

/// Timing-independence threshold, in basis points (p < 0.05).
pub const INDEPENDENCE_THRESHOLD_BPS: u64 = 500;

/// A placeholder proof.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockProof {
    pub proof_type: ProofType,
    pub claim: String,
    pub timestamp: Timestamp,
    /// Illustrative payload. Not covered by the mock hash.
    pub proof_data: BTreeMap<String, Value>,
    pub public_inputs: PublicInputs,
    pub is_valid: bool,
    pub mock_proof_hash: ContentDigest,
    pub mock_verification_key: ContentDigest,
}

/// Counts of generated proofs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProofStatistics {
    pub total_proofs: usize,
    pub by_type: BTreeMap<String, usize>,
    pub all_valid: bool,
}

/// `SHA-256("vk_" || family)`.
pub fn mock_verification_key(proof_type: ProofType) -> ContentDigest {
    ContentDigest::new(Sha256::digest(format!("vk_{proof_type}")).into())
}

/// SHA-256 over the canonical form of `(family, claim, timestamp, inputs)`.
///
/// # Errors
///
/// Returns [`CanonicalizationError::FloatRejected`] if `inputs` holds a
/// non-integer number.
pub fn mock_proof_hash(
    proof_type: ProofType,
    claim: &str,
    timestamp: &Timestamp,
    inputs: &PublicInputs,
) -> Result<ContentDigest, CanonicalizationError> {
    let transcript = json!({
        "proof_type": proof_type,
        "claim": claim,
        "timestamp": timestamp,
        "public_inputs": inputs,
    });
    Ok(privp_core::sha256_digest(&CanonicalBytes::new(&transcript)?))
}

fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data))
}

/// Running counts behind [`ProofStatistics`].
#[derive(Debug)]
struct Tally {
    by_type: BTreeMap<&'static str, usize>,
    total: usize,
    all_valid: bool,
}

impl Tally {
    fn new() -> Self {
        Self {
            by_type: ProofType::ALL.into_iter().map(|t| (t.as_str(), 0)).collect(),
            total: 0,
            all_valid: true,
        }
    }

    fn record(&mut self, proof_type: ProofType, is_valid: bool) {
        *self.by_type.entry(proof_type.as_str()).or_default() += 1;
        self.total += 1;
        self.all_valid &= is_valid;
    }
}

/// Placeholder proof generator and checker.
#[derive(Debug)]
pub struct MockZkProofSystem {
    verification_keys: BTreeMap<&'static str, ContentDigest>,
    tally: Mutex<Tally>,
}

impl Default for MockZkProofSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockZkProofSystem {
    pub fn new() -> Self {
        let verification_keys = ProofType::ALL
            .into_iter()
            .map(|t| (t.as_str(), mock_verification_key(t)))
            .collect();
        Self {
            verification_keys,
            tally: Mutex::new(Tally::new()),
        }
    }

    /// Verification key registered for `proof_type`.
    pub fn verification_key(&self, proof_type: ProofType) -> Option<&ContentDigest> {
        self.verification_keys.get(proof_type.as_str())
    }

    fn issue(
        &self,
        proof_type: ProofType,
        claim: String,
        proof_data: BTreeMap<String, Value>,
        public_inputs: PublicInputs,
        is_valid: bool,
    ) -> Result<MockProof, ProofError> {
        let timestamp = Timestamp::now();
        let mock_proof_hash = mock_proof_hash(proof_type, &claim, &timestamp, &public_inputs)
            .map_err(|e| ProofError::GenerationFailed(e.to_string()))?;
        self.tally.lock().record(proof_type, is_valid);
        tracing::debug!(backend = MOCK_BACKEND_NAME, proof_type = %proof_type, "mock proof generated");
        Ok(MockProof {
            proof_type,
            claim,
            timestamp,
            proof_data,
            public_inputs,
            is_valid,
            mock_proof_hash,
            mock_verification_key: mock_verification_key(proof_type),
        })
    }

    /// "One of `anonymity_set_size` peers." The peer is never an input.
    pub fn generate_anonymity_set_proof(&self, anonymity_set_size: u64) -> Result<MockProof, ProofError> {
        self.anonymity_set_proof(anonymity_set_size, None)
    }

    /// As [`Self::generate_anonymity_set_proof`], with `ctx_hash` among the
    /// hashed public inputs when given.
    fn anonymity_set_proof(
        &self,
        anonymity_set_size: u64,
        ctx_hash: Option<&ContentDigest>,
    ) -> Result<MockProof, ProofError> {
        let proof_data = BTreeMap::from([
            (keys::ANONYMITY_SET_SIZE.to_string(), json!(anonymity_set_size)),
            (
                "mock_merkle_root".to_string(),
                json!(sha256_hex(&format!("set_{anonymity_set_size}"))),
            ),
        ]);
        let mut inputs = PublicInputs::new();
        inputs.insert(keys::ANONYMITY_SET_SIZE, anonymity_set_size);
        inputs.insert("merkle_root", "mock_root_hash");
        if let Some(hash) = ctx_hash {
            inputs.insert_bytes(keys::CTX_HASH, hash.as_bytes());
        }
        self.issue(
            ProofType::AnonymitySetMembership,
            format!("Peer is one of {anonymity_set_size} peers in anonymity set"),
            proof_data,
            inputs,
            true,
        )
    }

    /// "These sessions cannot be linked." Only session hashes are recorded.
    pub fn generate_unlinkability_proof(
        &self,
        session_1: &str,
        session_2: &str,
        are_unlinkable: bool,
    ) -> Result<MockProof, ProofError> {
        let proof_data = BTreeMap::from([
            ("session_1_commitment".to_string(), json!(sha256_hex(session_1))),
            ("session_2_commitment".to_string(), json!(sha256_hex(session_2))),
        ]);
        let mut inputs = PublicInputs::new();
        inputs.insert("session_1_commitment", "mock_commitment_1");
        inputs.insert("session_2_commitment", "mock_commitment_2");
        self.issue(
            ProofType::SessionUnlinkability,
            "Sessions are cryptographically unlinkable".to_string(),
            proof_data,
            inputs,
            are_unlinkable,
        )
    }

    /// "`value_name` lies in `[min, max]`."
    pub fn generate_range_proof(
        &self,
        value_name: &str,
        min: i64,
        max: i64,
        actual: Option<i64>,
    ) -> Result<MockProof, ProofError> {
        let commitment = match actual {
            Some(v) => sha256_hex(&format!("{value_name}_{v}")),
            None => "mock_commitment".to_string(),
        };
        let proof_data = BTreeMap::from([
            ("range_min".to_string(), json!(min)),
            ("range_max".to_string(), json!(max)),
            ("commitment".to_string(), json!(commitment)),
        ]);
        let mut inputs = PublicInputs::new();
        inputs.insert("min_value", min);
        inputs.insert("max_value", max);
        let in_range = actual.map_or(true, |v| (min..=max).contains(&v));
        self.issue(
            ProofType::RangeProof,
            format!("{value_name} is within range [{min}, {max}]"),
            proof_data,
            inputs,
            in_range,
        )
    }

    /// "Events are timing-independent."
    pub fn generate_timing_independence_proof(
        &self,
        event_1: &str,
        event_2: &str,
    ) -> Result<MockProof, ProofError> {
        let proof_data = BTreeMap::from([
            ("event_1_commitment".to_string(), json!(sha256_hex(event_1))),
            ("event_2_commitment".to_string(), json!(sha256_hex(event_2))),
        ]);
        let mut inputs = PublicInputs::new();
        inputs.insert("independence_threshold_bps", INDEPENDENCE_THRESHOLD_BPS);
        self.issue(
            ProofType::TimingIndependence,
            "Events are timing-independent".to_string(),
            proof_data,
            inputs,
            true,
        )
    }

    /// Registered key matches, the hash recomputes, and the claim holds.
    pub fn verify_proof(&self, proof: &MockProof) -> bool {
        let vk_ok = self
            .verification_key(proof.proof_type)
            .map_or(choice(false), |vk| {
                vk.as_bytes()[..].ct_eq(&proof.mock_verification_key.as_bytes()[..])
            });
        let hash_ok = mock_proof_hash(
            proof.proof_type,
            &proof.claim,
            &proof.timestamp,
            &proof.public_inputs,
        )
        .map_or(choice(false), |h| {
            h.as_bytes()[..].ct_eq(&proof.mock_proof_hash.as_bytes()[..])
        });
        bool::from(vk_ok & hash_ok & choice(proof.is_valid))
    }

    /// True iff every proof verifies.
    pub fn batch_verify(&self, proofs: &[MockProof]) -> bool {
        proofs.iter().fold(true, |all, p| self.verify_proof(p) & all)
    }

    pub fn statistics(&self) -> ProofStatistics {
        let tally = self.tally.lock();
        ProofStatistics {
            total_proofs: tally.total,
            by_type: tally
                .by_type
                .iter()
                .map(|(family, count)| ((*family).to_string(), *count))
                .collect(),
            all_valid: tally.all_valid,
        }
    }
}

/// [`MockZkProofSystem`] behind the [`ProofBackend`] contract.
///
/// Encoding into [`ZKProof`]:
///
/// | Field        | Content                                        |
/// |--------------|------------------------------------------------|
/// | `commitment` | mock hash (32 bytes)                           |
/// | `challenge`  | verification key (32 bytes)                    |
/// | `response`   | `SHA-256(hash \|\| vk)`, twice (64 bytes)      |
/// | `public_inputs` | mock inputs, `ctx_hash`, `mock: true`, `claim` |
#[derive(Debug, Default)]
pub struct MockAdapter {
    system: MockZkProofSystem,
}

impl MockAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn system(&self) -> &MockZkProofSystem {
        &self.system
    }

    /// Mock anonymity-set proof for a validated context, carrying the
    /// context hash.
    ///
    /// # Errors
    ///
    /// Returns [`ProofError::InvalidContext`] if `ctx` fails validation.
    pub fn generate_anonymity_set_proof(
        &self,
        ctx: &ProofContext,
        anonymity_set_size: u64,
    ) -> Result<ZKProof, ProofError> {
        ctx.validate()?;
        let ctx_hash = ctx.context_hash()?;
        let mock = self.system.anonymity_set_proof(anonymity_set_size, Some(&ctx_hash))?;
        Ok(encode(&mock))
    }
}

fn mock_response(hash: &ContentDigest, vk: &ContentDigest) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(hash.as_bytes());
    hasher.update(vk.as_bytes());
    let half = hasher.finalize();
    [&half[..], &half[..]].concat()
}

fn encode(mock: &MockProof) -> ZKProof {
    let mut public_inputs = mock.public_inputs.clone();
    public_inputs.insert(keys::MOCK, true);
    public_inputs.insert(keys::CLAIM, mock.claim.clone());
    ZKProof {
        proof_type: mock.proof_type,
        commitment: mock.mock_proof_hash.as_bytes().to_vec(),
        challenge: mock.mock_verification_key.as_bytes().to_vec(),
        response: mock_response(&mock.mock_proof_hash, &mock.mock_verification_key),
        public_inputs,
        timestamp: mock.timestamp,
    }
}

impl ProofBackend for MockAdapter {
    fn name(&self) -> &'static str {
        MOCK_BACKEND_NAME
    }

    fn version(&self) -> &'static str {
        MOCK_BACKEND_VERSION
    }

    fn generate_commitment_opening_proof(&self, ctx: &ProofContext) -> Result<ZKProof, ProofError> {
        self.generate_anonymity_set_proof(ctx, ctx.anonymity_set_size())
    }

    /// Uses `anonymity_set_size` from `public_inputs` when present,
    /// otherwise from the context.
    fn generate_proof(
        &self,
        ctx: &ProofContext,
        _witness: &Witness,
        public_inputs: &PublicInputs,
    ) -> Result<ZKProof, ProofError> {
        let size = public_inputs
            .u64(keys::ANONYMITY_SET_SIZE)
            .unwrap_or_else(|| ctx.anonymity_set_size());
        self.generate_anonymity_set_proof(ctx, size)
    }

    fn verify_proof(&self, proof: &ZKProof, expected: Option<&PublicInputs>) -> bool {
        let inputs = &proof.public_inputs;
        let claim = inputs.str(keys::CLAIM).unwrap_or_default();

        let mut ok = choice(inputs.flag(keys::MOCK) == Some(true));
        ok &= choice(inputs.str(keys::CLAIM).is_some());

        let mut stripped = inputs.clone();
        stripped.remove(keys::MOCK);
        stripped.remove(keys::CLAIM);
        let hash = mock_proof_hash(proof.proof_type, claim, &proof.timestamp, &stripped)
            .unwrap_or(ContentDigest::new([0u8; 32]));
        let vk = self
            .system
            .verification_key(proof.proof_type)
            .copied()
            .unwrap_or(ContentDigest::new([0u8; 32]));

        ok &= proof.commitment.as_slice().ct_eq(&hash.as_bytes()[..]);
        ok &= proof.challenge.as_slice().ct_eq(&vk.as_bytes()[..]);
        ok &= proof.response.as_slice().ct_eq(mock_response(&hash, &vk).as_slice());
        if let Some(expected) = expected {
            ok &= expected_inputs_match(inputs, expected);
        }

        let accepted = bool::from(ok);
        tracing::debug!(backend = MOCK_BACKEND_NAME, accepted, "proof verified");
        accepted
    }

    fn backend_info(&self) -> BackendInfo {
        BackendInfo {
            name: MOCK_BACKEND_NAME.to_string(),
            version: MOCK_BACKEND_VERSION.to_string(),
            curve: None,
            library: "sha2".to_string(),
            features: vec!["illustrative_placeholder".to_string()],
            claim: "none: illustrative placeholder without soundness".to_string(),
        }
    }
}
