//! # Proof Backend Trait (Sealed)
//!
//! [`ProofBackend`] is the one contract every backend satisfies: generate a
//! [`ZKProof`] for a [`ProofContext`], verify any `ZKProof` to a plain
//! `bool`, and describe itself.
//!
//! ## Sealed Trait
//!
//! Only types inside `privp-zkp` can implement `ProofBackend`. A verifier
//! holding a `&dyn ProofBackend` or a [`ZkBackend`](crate::factory::ZkBackend)
//! therefore knows the acceptance logic is one of the audited ones.
//!
//! ## Verification Contract
//!
//! `verify_proof` never returns an error and never panics on malformed
//! input. It evaluates every check, and neither its result nor its logs say
//! which check failed.

use std::collections::BTreeMap;

use privp_core::{ContextError, ProofContext, PublicInputs, ZKProof};
use privp_crypto::sigma::CONTEXT_HASH_BYTES;
use privp_crypto::CryptoError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use subtle::{Choice, ConstantTimeEq};
use thiserror::Error;

use privp_core::keys;

/// Secret witness material. Unused by the current backends.
pub type Witness = BTreeMap<String, Value>;

/// Error during proof generation.
#[derive(Error, Debug)]
pub enum ProofError {
    /// The context was rejected before any cryptographic work.
    #[error(transparent)]
    InvalidContext(#[from] ContextError),
    /// A group operation failed.
    #[error("cryptographic failure: {0}")]
    Crypto(#[from] CryptoError),
    /// Proof generation failed internally.
    #[error("proof generation failed: {0}")]
    GenerationFailed(String),
}

/// Self-description of a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendInfo {
    pub name: String,
    pub version: String,
    /// Curve name, if the backend works over a group.
    pub curve: Option<String>,
    /// Library providing the primitives.
    pub library: String,
    pub features: Vec<String>,
    /// What a valid proof actually establishes.
    pub claim: String,
}

mod private {
    /// Sealing marker. Not accessible outside `privp-zkp`.
    pub trait Sealed {}
}

/// Sealed interface shared by every proof backend.
///
/// Backends are stateless between calls and `Send + Sync`.
pub trait ProofBackend: private::Sealed + Send + Sync {
    /// Short backend name.
    fn name(&self) -> &'static str;

    /// Semantic version of the proof format.
    fn version(&self) -> &'static str;

    /// Produce a proof bound to `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`ProofError::InvalidContext`] if `ctx` fails validation.
    fn generate_commitment_opening_proof(&self, ctx: &ProofContext) -> Result<ZKProof, ProofError>;

    /// Generic entry point. Backends may ignore `witness`.
    ///
    /// # Errors
    ///
    /// As [`Self::generate_commitment_opening_proof`].
    fn generate_proof(
        &self,
        ctx: &ProofContext,
        witness: &Witness,
        public_inputs: &PublicInputs,
    ) -> Result<ZKProof, ProofError>;

    /// Verify `proof`. When `expected` is given it must carry the
    /// `ctx_hash` the proof is bound to, and each of its other entries that
    /// the proof also carries must match. Expectations without `ctx_hash`
    /// reject.
    fn verify_proof(&self, proof: &ZKProof, expected: Option<&PublicInputs>) -> bool;

    /// True iff `proofs` is empty or every proof verifies. Every proof is
    /// checked even after a failure.
    fn batch_verify(&self, proofs: &[ZKProof]) -> bool {
        let accepted = proofs
            .iter()
            .fold(true, |all, proof| self.verify_proof(proof, None) & all);
        tracing::debug!(backend = self.name(), count = proofs.len(), accepted, "batch verified");
        accepted
    }

    fn backend_info(&self) -> BackendInfo;

    /// Called when a [`BackendSession`] opens.
    fn acquire(&self) {}

    /// Called when a [`BackendSession`] closes.
    fn release(&self) {}
}

/// Scoped use of a backend: `acquire` on creation, `release` on drop.
pub struct BackendSession<'a, B: ProofBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: ProofBackend + ?Sized> BackendSession<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        backend.acquire();
        tracing::trace!(backend = backend.name(), "backend session opened");
        Self { backend }
    }
}

impl<B: ProofBackend + ?Sized> std::ops::Deref for BackendSession<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.backend
    }
}

impl<B: ProofBackend + ?Sized> Drop for BackendSession<'_, B> {
    fn drop(&mut self) {
        self.backend.release();
        tracing::trace!(backend = self.backend.name(), "backend session closed");
    }
}

pub(crate) fn choice(b: bool) -> Choice {
    Choice::from(u8::from(b))
}

/// Check `expected` against `actual` without short-circuiting.
///
/// `expected` must name a 32-byte `ctx_hash`, and `actual` must carry the
/// same bytes. Any other expected key is compared only if `actual` carries
/// it.
pub(crate) fn expected_inputs_match(actual: &PublicInputs, expected: &PublicInputs) -> Choice {
    let have = actual.bytes(keys::CTX_HASH).unwrap_or_default();
    let want = expected.bytes(keys::CTX_HASH).unwrap_or_default();
    let mut ok = choice(want.len() == CONTEXT_HASH_BYTES) & have.as_slice().ct_eq(want.as_slice());
    for (key, want) in expected.iter() {
        if key == keys::CTX_HASH {
            continue;
        }
        if let Some(have) = actual.get(key) {
            ok &= choice(have == want);
        }
    }
    ok
}

impl private::Sealed for crate::pedersen::PedersenBackend {}
impl private::Sealed for crate::mock::MockAdapter {}
impl private::Sealed for crate::factory::ZkBackend {}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, Value)]) -> PublicInputs {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn ctx_hash_must_match_bytes() {
        let actual = inputs(&[(keys::CTX_HASH, Value::from("ab".repeat(32)))]);
        let same = inputs(&[(keys::CTX_HASH, Value::from("ab".repeat(32)))]);
        let upper = inputs(&[(keys::CTX_HASH, Value::from("AB".repeat(32)))]);
        let other = inputs(&[(keys::CTX_HASH, Value::from("cd".repeat(32)))]);
        assert!(bool::from(expected_inputs_match(&actual, &same)));
        assert!(!bool::from(expected_inputs_match(&actual, &upper)));
        assert!(!bool::from(expected_inputs_match(&actual, &other)));
    }

    #[test]
    fn expected_ctx_hash_requires_presence() {
        let actual = inputs(&[]);
        let expected = inputs(&[(keys::CTX_HASH, Value::from("ab".repeat(32)))]);
        assert!(!bool::from(expected_inputs_match(&actual, &expected)));
    }

    #[test]
    fn unknown_expected_keys_are_ignored() {
        let hash = Value::from("ab".repeat(32));
        let actual = inputs(&[(keys::CTX_HASH, hash.clone()), (keys::VERSION, Value::from(1))]);
        let expected = inputs(&[
            (keys::CTX_HASH, hash),
            ("session_id", Value::from("s")),
            (keys::VERSION, Value::from(1)),
        ]);
        assert!(bool::from(expected_inputs_match(&actual, &expected)));
    }

    #[test]
    fn expectations_without_ctx_hash_reject() {
        let actual = inputs(&[
            (keys::CTX_HASH, Value::from("ab".repeat(32))),
            (keys::ANONYMITY_SET_SIZE, Value::from(4)),
        ]);
        let expected = inputs(&[
            (keys::ANONYMITY_SET_SIZE, Value::from(4)),
            ("session_id", Value::from("session_other")),
        ]);
        assert!(!bool::from(expected_inputs_match(&actual, &expected)));
        assert!(!bool::from(expected_inputs_match(&actual, &inputs(&[]))));
    }

    #[test]
    fn short_ctx_hash_rejects_even_when_equal() {
        let actual = inputs(&[(keys::CTX_HASH, Value::from("abcd"))]);
        let expected = inputs(&[(keys::CTX_HASH, Value::from("abcd"))]);
        assert!(!bool::from(expected_inputs_match(&actual, &expected)));
    }

    #[test]
    fn shared_keys_must_be_equal() {
        let hash = Value::from("ab".repeat(32));
        let actual = inputs(&[(keys::CTX_HASH, hash.clone()), (keys::ANONYMITY_SET_SIZE, Value::from(4))]);
        let same = inputs(&[(keys::CTX_HASH, hash.clone()), (keys::ANONYMITY_SET_SIZE, Value::from(4))]);
        let other = inputs(&[(keys::CTX_HASH, hash), (keys::ANONYMITY_SET_SIZE, Value::from(5))]);
        assert!(bool::from(expected_inputs_match(&actual, &same)));
        assert!(!bool::from(expected_inputs_match(&actual, &other)));
    }

    #[test]
    fn proof_error_wraps_context_error() {
        let err: ProofError = ContextError::ValueViolation("peer_id cannot be empty".into()).into();
        assert_eq!(err.to_string(), "value violation: peer_id cannot be empty");
    }
}
