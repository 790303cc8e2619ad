//! # Error Types
//!
//! Construction-time errors for privp's boundary types. All errors derive
//! `thiserror::Error`.
//!
//! ## Design
//!
//! - Context errors are caller errors: they are raised before any
//!   cryptographic work and name the offending field.
//! - Proof verification never produces an error. A rejected proof is a
//!   plain `false`, so nothing in this module describes verification.

use thiserror::Error;

/// Top-level error type for `privp-core`.
#[derive(Error, Debug)]
pub enum PrivpError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A proof context was rejected.
    #[error("invalid proof context: {0}")]
    Context(#[from] ContextError),

    /// A timestamp could not be parsed or constructed.
    #[error("invalid timestamp: {0}")]
    Timestamp(String),

    /// A proof family name is not recognised.
    #[error("unknown proof type: {0:?}")]
    UnknownProofType(String),

    /// Serialization/deserialization of a proof record failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations; use an integer or string: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// A proof context failed validation.
///
/// `TypeViolation` covers payloads with the wrong shape (a field missing or
/// of the wrong JSON type). `ValueViolation` covers well-typed fields with
/// unusable values (empty identifiers, float metadata).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The context, or one of its fields, has the wrong type.
    #[error("type violation: {0}")]
    TypeViolation(String),

    /// A context field holds a value that cannot be used.
    #[error("value violation: {0}")]
    ValueViolation(String),
}
