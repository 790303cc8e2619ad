//! Deterministic derivation of the committed value from an identifier.

use k256::Scalar;
use privp_core::Sha256Accumulator;

use crate::encoding::scalar_from_digest;

/// Domain tag for value derivation.
pub const VALUE_DOMAIN: &[u8] = b"privp/pedersen/value/v1";

/// `SHA-256(VALUE_DOMAIN || identifier) mod n`.
///
/// Accepts any identifier, including the empty string. Rejecting empty
/// identifiers is the caller's job.
pub fn derive_value(identifier: &str) -> Scalar {
    let mut acc = Sha256Accumulator::new(VALUE_DOMAIN);
    acc.update(identifier.as_bytes());
    scalar_from_digest(acc.finalize().as_bytes())
}
