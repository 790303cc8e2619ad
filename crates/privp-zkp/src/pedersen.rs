//! # Pedersen Commitment-Opening Backend
//!
//! Proves knowledge of the opening of `C = v·G + r·H`, where `v` is derived
//! from the context's peer identifier and `r` is fresh per proof, bound to
//! the context's canonical hash.
//!
//! ## Claim
//!
//! A valid proof shows the prover knows *an* opening of `C` and produced the
//! proof for the hashed context. It does not show membership in any set;
//! `anonymity_set_size` is carried as a label only, and every proof is
//! marked `claim_only: true`.
//!
//! ## Record Layout
//!
//! | Field        | Content                                           |
//! |--------------|---------------------------------------------------|
//! | `commitment` | compressed `C` (33 bytes)                         |
//! | `challenge`  | `c` (32 bytes)                                    |
//! | `response`   | `z_v \|\| z_b` (64 bytes)                         |
//! | `public_inputs` | `v`, `curve`, `anonymity_set_size`, `ctx_hash`, `A`, `claim_only` |

use std::sync::Arc;

use privp_core::{keys, ProofContext, ProofType, PublicInputs, Timestamp, ZKProof};
use privp_crypto::{
    commit, derive_value, get_parameters, prove_opening, verify_opening, CurveParameters,
};
use subtle::Choice;
use zeroize::Zeroizing;

use crate::traits::{
    choice, expected_inputs_match, BackendInfo, ProofBackend, ProofError, Witness,
};

/// Statement version written to `public_inputs.v`.
pub const STATEMENT_VERSION: u64 = 1;

/// Backend name.
pub const PEDERSEN_BACKEND_NAME: &str = "pedersen-schnorr";

/// Proof format version.
pub const PEDERSEN_BACKEND_VERSION: &str = "1.0.0";

/// What a valid proof establishes.
pub const OPENING_CLAIM: &str = "knowledge-of-opening";

/// Pedersen + sigma-protocol backend over secp256k1.
#[derive(Debug, Clone)]
pub struct PedersenBackend {
    params: Arc<CurveParameters>,
}

impl Default for PedersenBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PedersenBackend {
    /// Backend using the process-wide cached parameters.
    pub fn new() -> Self {
        Self::with_parameters(get_parameters())
    }

    /// Backend using injected parameters.
    pub fn with_parameters(params: Arc<CurveParameters>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Arc<CurveParameters> {
        &self.params
    }

    /// Verify `proof` against a live context, recomputing its hash.
    ///
    /// The `anonymity_set_size` input is not part of the sigma transcript,
    /// so it is checked here against the context's own value.
    ///
    /// Returns `false` if the context cannot be canonicalized.
    pub fn verify_proof_for_context(&self, proof: &ZKProof, ctx: &ProofContext) -> bool {
        let Ok(hash) = ctx.context_hash() else {
            return false;
        };
        let mut expected = PublicInputs::new();
        expected.insert_bytes(keys::CTX_HASH, hash.as_bytes());
        expected.insert(keys::ANONYMITY_SET_SIZE, ctx.anonymity_set_size());
        self.verify_proof(proof, Some(&expected))
    }

    fn check(&self, proof: &ZKProof, expected: Option<&PublicInputs>) -> Choice {
        let params = &self.params;
        let inputs = &proof.public_inputs;

        let ctx_hash = inputs.bytes(keys::CTX_HASH).unwrap_or_default();
        let ephemeral = inputs.bytes(keys::EPHEMERAL).unwrap_or_default();

        let mut ok = choice(proof.proof_type == ProofType::AnonymitySetMembership);
        ok &= choice(inputs.u64(keys::VERSION) == Some(STATEMENT_VERSION));
        ok &= choice(inputs.str(keys::CURVE) == Some(params.curve_name()));
        ok &= choice(inputs.flag(keys::CLAIM_ONLY) == Some(true));
        ok &= choice(inputs.u64(keys::ANONYMITY_SET_SIZE).is_some());
        ok &= choice(proof.commitment.len() == params.point_bytes());
        ok &= choice(proof.challenge.len() == params.scalar_bytes());
        ok &= choice(proof.response.len() == 2 * params.scalar_bytes());
        ok &= choice(ephemeral.len() == params.point_bytes());
        if let Some(expected) = expected {
            ok &= expected_inputs_match(inputs, expected);
        }
        ok &= choice(verify_opening(
            params,
            &proof.commitment,
            &ctx_hash,
            &ephemeral,
            &proof.challenge,
            &proof.response,
        ));
        ok
    }
}

impl ProofBackend for PedersenBackend {
    fn name(&self) -> &'static str {
        PEDERSEN_BACKEND_NAME
    }

    fn version(&self) -> &'static str {
        PEDERSEN_BACKEND_VERSION
    }

    fn generate_commitment_opening_proof(&self, ctx: &ProofContext) -> Result<ZKProof, ProofError> {
        ctx.validate()?;
        let ctx_hash = ctx.context_hash()?;

        let value = Zeroizing::new(derive_value(&ctx.peer_id));
        let (commitment, opening) = commit(&self.params, &value, None)?;
        let sigma = prove_opening(&self.params, &commitment, &opening, ctx_hash.as_bytes())?;

        let mut public_inputs = PublicInputs::new();
        public_inputs.insert(keys::VERSION, STATEMENT_VERSION);
        public_inputs.insert(keys::CURVE, self.params.curve_name());
        public_inputs.insert(keys::ANONYMITY_SET_SIZE, ctx.anonymity_set_size());
        public_inputs.insert_bytes(keys::CTX_HASH, ctx_hash.as_bytes());
        public_inputs.insert_bytes(keys::EPHEMERAL, &sigma.ephemeral);
        public_inputs.insert(keys::CLAIM_ONLY, true);

        tracing::debug!(backend = PEDERSEN_BACKEND_NAME, "commitment opening proof generated");

        Ok(ZKProof {
            proof_type: ProofType::AnonymitySetMembership,
            commitment: commitment.as_bytes().to_vec(),
            challenge: sigma.challenge.to_vec(),
            response: sigma.response.to_vec(),
            public_inputs,
            timestamp: Timestamp::now(),
        })
    }

    /// Same as [`Self::generate_commitment_opening_proof`]. The witness is
    /// derived from the context, so `witness` and `public_inputs` are not
    /// consulted.
    fn generate_proof(
        &self,
        ctx: &ProofContext,
        _witness: &Witness,
        _public_inputs: &PublicInputs,
    ) -> Result<ZKProof, ProofError> {
        self.generate_commitment_opening_proof(ctx)
    }

    fn verify_proof(&self, proof: &ZKProof, expected: Option<&PublicInputs>) -> bool {
        let accepted = bool::from(self.check(proof, expected));
        tracing::debug!(backend = PEDERSEN_BACKEND_NAME, accepted, "proof verified");
        accepted
    }

    fn backend_info(&self) -> BackendInfo {
        BackendInfo {
            name: PEDERSEN_BACKEND_NAME.to_string(),
            version: PEDERSEN_BACKEND_VERSION.to_string(),
            curve: Some(self.params.curve_name().to_string()),
            library: "k256".to_string(),
            features: [
                "commitment_opening_pok",
                "fiat_shamir",
                "context_binding",
                "batch_verify",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            claim: OPENING_CLAIM.to_string(),
        }
    }
}
