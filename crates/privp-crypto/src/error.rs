//! Errors raised by the cryptographic primitives.
//!
//! Only construction paths return these. Verification functions in this
//! crate return `bool` and never surface a reason.

use thiserror::Error;

/// Failure decoding or producing a group element or scalar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Bytes do not decode to a valid curve point.
    #[error("invalid point encoding: {0}")]
    InvalidPoint(String),

    /// The point at infinity has no compressed encoding.
    #[error("point at infinity cannot be encoded")]
    IdentityPoint,

    /// Bytes are not a canonical scalar below the group order.
    #[error("invalid scalar encoding: {0}")]
    InvalidScalar(String),
}
