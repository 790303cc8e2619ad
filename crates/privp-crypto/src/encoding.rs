//! # Point and Scalar Encoding
//!
//! Points are SEC1 compressed (33 bytes), scalars are big-endian (32 bytes).
//!
//! The `decode_*` functions never fail. They return a fallback value and a
//! [`Choice`] recording validity, so a verifier can run every check and
//! combine the results without branching on secret-dependent data.

use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::PrimeField;
use k256::{EncodedPoint, FieldBytes, ProjectivePoint, Scalar, U256};
use subtle::{Choice, ConstantTimeEq};

use crate::error::CryptoError;

/// Length of a compressed point.
pub const POINT_BYTES: usize = 33;

/// Length of an encoded scalar.
pub const SCALAR_BYTES: usize = 32;

/// Compress a point.
///
/// # Errors
///
/// Returns [`CryptoError::IdentityPoint`] for the point at infinity.
pub fn encode_point(point: &ProjectivePoint) -> Result<[u8; POINT_BYTES], CryptoError> {
    let encoded = point.to_affine().to_encoded_point(true);
    <[u8; POINT_BYTES]>::try_from(encoded.as_bytes()).map_err(|_| CryptoError::IdentityPoint)
}

/// Decode a compressed, non-identity point.
///
/// Only the `0x02` / `0x03` tags are accepted. On failure the identity is
/// returned with a false [`Choice`].
pub fn decode_point(bytes: &[u8]) -> (ProjectivePoint, Choice) {
    let invalid = (ProjectivePoint::IDENTITY, Choice::from(0));
    if bytes.len() != POINT_BYTES {
        return invalid;
    }
    let tag_ok = bytes[0].ct_eq(&0x02) | bytes[0].ct_eq(&0x03);
    let Ok(encoded) = EncodedPoint::from_bytes(bytes) else {
        return invalid;
    };
    let decoded = ProjectivePoint::from_encoded_point(&encoded);
    let ok = decoded.is_some();
    let point = decoded.unwrap_or(ProjectivePoint::IDENTITY);
    (point, tag_ok & ok & !point.is_identity())
}

/// Decode a compressed point, failing loudly.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidPoint`] if the bytes are the wrong length,
/// off the curve, or the identity.
pub fn point_from_bytes(bytes: &[u8]) -> Result<ProjectivePoint, CryptoError> {
    let (point, ok) = decode_point(bytes);
    if bool::from(ok) {
        Ok(point)
    } else {
        Err(CryptoError::InvalidPoint(format!(
            "expected {POINT_BYTES}-byte compressed non-identity point"
        )))
    }
}

/// Big-endian scalar bytes.
pub fn encode_scalar(scalar: &Scalar) -> [u8; SCALAR_BYTES] {
    scalar.to_bytes().into()
}

/// Decode a canonical scalar (strictly below the group order).
///
/// On failure zero is returned with a false [`Choice`].
pub fn decode_scalar(bytes: &[u8]) -> (Scalar, Choice) {
    if bytes.len() != SCALAR_BYTES {
        return (Scalar::ZERO, Choice::from(0));
    }
    let decoded = Scalar::from_repr(*FieldBytes::from_slice(bytes));
    let ok = decoded.is_some();
    (decoded.unwrap_or(Scalar::ZERO), ok)
}

/// Decode a canonical scalar, failing loudly.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidScalar`] for a wrong length or a value not
/// below the group order.
pub fn scalar_from_bytes(bytes: &[u8]) -> Result<Scalar, CryptoError> {
    let (scalar, ok) = decode_scalar(bytes);
    if bool::from(ok) {
        Ok(scalar)
    } else {
        Err(CryptoError::InvalidScalar(format!(
            "expected {SCALAR_BYTES}-byte big-endian scalar below the group order"
        )))
    }
}

/// Interpret a 32-byte digest as an integer and reduce it modulo the order.
pub fn scalar_from_digest(digest: &[u8; 32]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(FieldBytes::from_slice(digest))
}
