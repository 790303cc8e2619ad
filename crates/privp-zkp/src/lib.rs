//! # privp-zkp — Proof Backends
//!
//! Proofs that a peer holds the opening of a commitment derived from its
//! identity, bound to a session context, without revealing the identity.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): the sealed [`ProofBackend`] contract. Every
//!   backend generates a [`ZKProof`](privp_core::ZKProof) from a
//!   [`ProofContext`](privp_core::ProofContext) and verifies any proof to a
//!   plain `bool`.
//!
//! - **Pedersen** (`pedersen.rs`): [`PedersenBackend`], a Pedersen
//!   commitment over secp256k1 with a Fiat-Shamir sigma proof of opening.
//!   It proves knowledge of an opening only. Set membership is a labelled
//!   claim (`claim_only`), not a proven statement.
//!
//! - **Mock** (`mock.rs`): [`MockZkProofSystem`] and its [`MockAdapter`].
//!   Hash-based placeholders with no soundness, for development only.
//!
//! - **Policy** (`policy.rs`) and **Factory** (`factory.rs`): select a
//!   backend by name and refuse the mock backend in production mode.
//!
//! - **Config** (`config.rs`): backend and policy from the environment.
//!
//! ## Crate Policy
//!
//! - Depends on `privp-core` and `privp-crypto` internally.
//! - Verification never panics and never reports which check failed.
//! - No `unsafe`.

pub mod config;
pub mod factory;
pub mod mock;
pub mod pedersen;
pub mod policy;
pub mod traits;

pub use config::{BackendConfig, ConfigError, BACKEND_ENV_VAR};
pub use factory::{
    backend_from_config, select_backend, select_backend_with_policy, BackendKind, FactoryError,
    ZkBackend,
};
pub use mock::{MockAdapter, MockProof, MockZkProofSystem, ProofStatistics};
pub use pedersen::{PedersenBackend, PEDERSEN_BACKEND_NAME, PEDERSEN_BACKEND_VERSION};
pub use policy::{PolicyError, PolicyMode, ProofPolicy, POLICY_ENV_VAR};
pub use traits::{BackendInfo, BackendSession, ProofBackend, ProofError, Witness};
