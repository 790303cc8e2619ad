//! # privp-core — Foundational Types for privp
//!
//! This crate defines the data that flows between privp's proof backends
//! and their callers. Every other crate in the workspace depends on
//! `privp-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** The context hash bound into every proof
//!    is computed from `CanonicalBytes` (RFC 8785 JCS, floats rejected).
//!    Two verifiers can never disagree about the bytes a proof commits to.
//!
//! 2. **`sha256_digest()` accepts only `&CanonicalBytes`.** Transcript
//!    hashing over binary fields goes through `Sha256Accumulator`, which
//!    always begins with a domain tag.
//!
//! 3. **UTC-only timestamps.** `Timestamp` enforces the `Z` suffix and
//!    seconds precision so contexts encode identically everywhere.
//!
//! 4. **Caller errors are typed.** A malformed context fails before any
//!    cryptographic work, as a `TypeViolation` (wrong shape) or a
//!    `ValueViolation` (unusable value).
//!
//! ## Crate Policy
//!
//! - No dependencies on other `privp-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod context;
pub mod digest;
pub mod error;
pub mod hex_bytes;
pub mod proof;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use context::{ProofContext, ANONYMITY_SET_SIZE_KEY};
pub use digest::{sha256_digest, sha256_hex, ContentDigest, Sha256Accumulator};
pub use error::{CanonicalizationError, ContextError, PrivpError};
pub use proof::{keys, ProofType, PublicInputs, ZKProof};
pub use temporal::Timestamp;
