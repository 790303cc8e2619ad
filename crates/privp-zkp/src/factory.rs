//! # Backend Factory
//!
//! Maps a backend preference string to a concrete backend. The set of
//! backends is closed: [`ZkBackend`] is an enum over every implementation
//! and implements [`ProofBackend`] by delegation.

use std::fmt;
use std::str::FromStr;

use privp_core::{ProofContext, PublicInputs, ZKProof};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::BackendConfig;
use crate::mock::{MockAdapter, MOCK_BACKEND_NAME};
use crate::pedersen::{PedersenBackend, PEDERSEN_BACKEND_NAME};
use crate::policy::{PolicyError, ProofPolicy};
use crate::traits::{BackendInfo, ProofBackend, ProofError, Witness};

/// Backend selection errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// The preference names no known backend.
    #[error("unknown ZK backend {0:?} (expected \"pedersen\" or \"mock\")")]
    UnknownBackend(String),
    /// The policy forbids the requested backend.
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Available backend kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Pedersen commitment with a sigma proof of opening.
    Pedersen,
    /// Illustrative hash-based placeholder.
    Mock,
}

impl BackendKind {
    /// Whether the backend provides real cryptographic soundness.
    pub fn is_real(self) -> bool {
        matches!(self, BackendKind::Pedersen)
    }

    /// The name the backend reports.
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Pedersen => PEDERSEN_BACKEND_NAME,
            BackendKind::Mock => MOCK_BACKEND_NAME,
        }
    }

    /// Preference string accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Pedersen => "pedersen",
            BackendKind::Mock => "mock",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = FactoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pedersen" => Ok(BackendKind::Pedersen),
            "mock" => Ok(BackendKind::Mock),
            _ => Err(FactoryError::UnknownBackend(s.to_string())),
        }
    }
}

/// Every backend, behind one type.
#[derive(Debug)]
pub enum ZkBackend {
    Pedersen(PedersenBackend),
    Mock(MockAdapter),
}

impl ZkBackend {
    /// Construct a backend of `kind`.
    pub fn new(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Pedersen => ZkBackend::Pedersen(PedersenBackend::new()),
            BackendKind::Mock => ZkBackend::Mock(MockAdapter::new()),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            ZkBackend::Pedersen(_) => BackendKind::Pedersen,
            ZkBackend::Mock(_) => BackendKind::Mock,
        }
    }

    fn inner(&self) -> &dyn ProofBackend {
        match self {
            ZkBackend::Pedersen(b) => b,
            ZkBackend::Mock(b) => b,
        }
    }
}

impl ProofBackend for ZkBackend {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn version(&self) -> &'static str {
        self.inner().version()
    }

    fn generate_commitment_opening_proof(&self, ctx: &ProofContext) -> Result<ZKProof, ProofError> {
        self.inner().generate_commitment_opening_proof(ctx)
    }

    fn generate_proof(
        &self,
        ctx: &ProofContext,
        witness: &Witness,
        public_inputs: &PublicInputs,
    ) -> Result<ZKProof, ProofError> {
        self.inner().generate_proof(ctx, witness, public_inputs)
    }

    fn verify_proof(&self, proof: &ZKProof, expected: Option<&PublicInputs>) -> bool {
        self.inner().verify_proof(proof, expected)
    }

    fn batch_verify(&self, proofs: &[ZKProof]) -> bool {
        self.inner().batch_verify(proofs)
    }

    fn backend_info(&self) -> BackendInfo {
        self.inner().backend_info()
    }

    fn acquire(&self) {
        self.inner().acquire()
    }

    fn release(&self) {
        self.inner().release()
    }
}

/// Backend for `preference` (`"pedersen"` or `"mock"`, any case).
///
/// # Errors
///
/// Returns [`FactoryError::UnknownBackend`] for any other preference.
pub fn select_backend(preference: &str) -> Result<ZkBackend, FactoryError> {
    let kind: BackendKind = preference.parse()?;
    tracing::info!(backend = kind.name(), "ZK backend selected");
    Ok(ZkBackend::new(kind))
}

/// [`select_backend`], refusing kinds that `policy` forbids.
///
/// # Errors
///
/// Returns [`FactoryError::UnknownBackend`] or [`FactoryError::Policy`].
pub fn select_backend_with_policy(
    preference: &str,
    policy: &ProofPolicy,
) -> Result<ZkBackend, FactoryError> {
    let kind: BackendKind = preference.parse()?;
    if let Err(e) = policy.validate(kind) {
        tracing::warn!(backend = kind.name(), mode = ?policy.mode(), "ZK backend refused by policy");
        return Err(e.into());
    }
    tracing::info!(backend = kind.name(), mode = ?policy.mode(), "ZK backend selected");
    Ok(ZkBackend::new(kind))
}

/// Backend described by `config`, subject to its policy.
///
/// # Errors
///
/// Returns [`FactoryError::Policy`] if the configured policy forbids the
/// configured backend.
pub fn backend_from_config(config: &BackendConfig) -> Result<ZkBackend, FactoryError> {
    select_backend_with_policy(config.backend.as_str(), &config.policy)
}
