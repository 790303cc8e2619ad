//! # privp-crypto — Cryptographic Primitives
//!
//! The building blocks behind privp's commitment-opening proofs:
//!
//! - **Curve parameters** for secp256k1, with a nothing-up-my-sleeve second
//!   generator and a process-wide cache.
//! - **Value derivation** from opaque identifiers.
//! - **Pedersen commitments** with constant-time opening checks.
//! - **Sigma proof** of knowledge of an opening, bound to a context hash by
//!   Fiat-Shamir.
//!
//! ## Crate Policy
//!
//! - Depends only on `privp-core` internally.
//! - Secret scalars (openings, nonces) are zeroized on drop.
//! - Verification returns `bool` and evaluates every check.
//! - No `unsafe` code.

pub mod derive;
pub mod encoding;
pub mod error;
pub mod params;
pub mod pedersen;
pub mod sigma;

pub use derive::derive_value;
pub use error::CryptoError;
pub use params::{get_parameters, CurveParameters, CURVE_NAME};
pub use pedersen::{commit, commit_with_rng, validate_format, verify_commitment, Commitment, Opening};
pub use sigma::{prove_opening, prove_opening_with_rng, verify_opening, OpeningProof};

// Group types appearing in public signatures.
pub use k256::{ProjectivePoint, Scalar};
