//! # Pedersen Commitments
//!
//! `C = v·G + r·H` over secp256k1.
//!
//! - **Hiding**: with uniform `r`, `C` is uniform and reveals nothing of `v`.
//! - **Binding**: opening `C` two ways yields `log_G(H)`.
//! - **Homomorphic**: `C(v1, r1) + C(v2, r2) = C(v1 + v2, r1 + r2)`.
//!
//! Blinding factors come from [`OsRng`], which reads the operating system
//! CSPRNG on every call and so stays safe across `fork()`.

use k256::elliptic_curve::Field;
use k256::{ProjectivePoint, Scalar};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::encoding::{decode_point, encode_point, point_from_bytes, POINT_BYTES};
use crate::error::CryptoError;
use crate::params::CurveParameters;

/// A commitment point with its compressed encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commitment {
    point: ProjectivePoint,
    encoded: [u8; POINT_BYTES],
}

impl Commitment {
    /// Wrap a point.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::IdentityPoint`] for the point at infinity.
    pub fn from_point(point: ProjectivePoint) -> Result<Self, CryptoError> {
        let encoded = encode_point(&point)?;
        Ok(Self { point, encoded })
    }

    /// Parse a compressed commitment.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidPoint`] unless the bytes are a
    /// compressed non-identity point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Self::from_point(point_from_bytes(bytes)?)
    }

    pub fn point(&self) -> ProjectivePoint {
        self.point
    }

    pub fn as_bytes(&self) -> &[u8; POINT_BYTES] {
        &self.encoded
    }

    /// Homomorphic sum of two commitments.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::IdentityPoint`] if the sum is the point at
    /// infinity (the commitments open to negated values).
    pub fn add(&self, other: &Commitment) -> Result<Commitment, CryptoError> {
        Self::from_point(self.point + other.point)
    }
}

/// The secret opening of a commitment. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Opening {
    value: Scalar,
    blinding: Scalar,
}

impl Opening {
    pub fn new(value: Scalar, blinding: Scalar) -> Self {
        Self { value, blinding }
    }

    pub fn value(&self) -> &Scalar {
        &self.value
    }

    pub fn blinding(&self) -> &Scalar {
        &self.blinding
    }
}

impl std::fmt::Debug for Opening {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Opening([REDACTED])")
    }
}

/// Commit to `value`, sampling the blinding from [`OsRng`] when absent.
///
/// # Errors
///
/// Returns [`CryptoError::IdentityPoint`] if `v·G + r·H` is the point at
/// infinity, which happens with negligible probability for random `r`.
pub fn commit(
    params: &CurveParameters,
    value: &Scalar,
    blinding: Option<Scalar>,
) -> Result<(Commitment, Opening), CryptoError> {
    commit_with_rng(params, value, blinding, &mut OsRng)
}

/// [`commit`] with a caller-supplied RNG.
pub fn commit_with_rng<R: RngCore + CryptoRng>(
    params: &CurveParameters,
    value: &Scalar,
    blinding: Option<Scalar>,
    rng: &mut R,
) -> Result<(Commitment, Opening), CryptoError> {
    let blinding = blinding.unwrap_or_else(|| Scalar::random(&mut *rng));
    let point = params.g() * value + params.h() * blinding;
    let commitment = Commitment::from_point(point)?;
    Ok((commitment, Opening::new(*value, blinding)))
}

/// Check that `commitment_bytes` opens to `(value, blinding)`.
///
/// The point comparison is constant-time.
pub fn verify_commitment(
    params: &CurveParameters,
    commitment_bytes: &[u8],
    value: &Scalar,
    blinding: &Scalar,
) -> bool {
    let (stored, decoded) = decode_point(commitment_bytes);
    let expected = params.g() * value + params.h() * blinding;
    bool::from(decoded & expected.ct_eq(&stored))
}

/// True iff `bytes` has the point length of `params` and decodes to a
/// non-identity curve point.
pub fn validate_format(params: &CurveParameters, bytes: &[u8]) -> bool {
    bytes.len() == params.point_bytes() && bool::from(decode_point(bytes).1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive_value;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params() -> CurveParameters {
        CurveParameters::secp256k1()
    }

    #[test]
    fn commit_then_verify() {
        let p = params();
        let v = derive_value("QmTest123");
        let (c, opening) = commit(&p, &v, None).unwrap();
        assert_eq!(c.as_bytes().len(), 33);
        assert!(verify_commitment(&p, c.as_bytes(), opening.value(), opening.blinding()));
    }

    #[test]
    fn wrong_value_or_blinding_fails() {
        let p = params();
        let v = derive_value("a");
        let (c, opening) = commit(&p, &v, None).unwrap();
        assert!(!verify_commitment(&p, c.as_bytes(), &derive_value("b"), opening.blinding()));
        assert!(!verify_commitment(&p, c.as_bytes(), opening.value(), &(*opening.blinding() + Scalar::ONE)));
    }

    #[test]
    fn malformed_commitment_bytes_fail_verification() {
        let p = params();
        let v = derive_value("a");
        let (c, opening) = commit(&p, &v, None).unwrap();
        assert!(!verify_commitment(&p, &c.as_bytes()[..32], opening.value(), opening.blinding()));
        assert!(!verify_commitment(&p, &[0u8; 33], opening.value(), opening.blinding()));
    }

    #[test]
    fn explicit_blinding_is_deterministic() {
        let p = params();
        let v = derive_value("peer");
        let r = Scalar::from(42u64);
        let (a, _) = commit(&p, &v, Some(r)).unwrap();
        let (b, _) = commit(&p, &v, Some(r)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let p = params();
        let v = derive_value("peer");
        let (a, _) = commit_with_rng(&p, &v, None, &mut StdRng::seed_from_u64(7)).unwrap();
        let (b, _) = commit_with_rng(&p, &v, None, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fresh_blinding_hides_equal_values() {
        let p = params();
        let v = derive_value("peer");
        let (a, _) = commit(&p, &v, None).unwrap();
        let (b, _) = commit(&p, &v, None).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn homomorphic_addition() {
        let p = params();
        let (v1, v2) = (Scalar::from(3u64), Scalar::from(5u64));
        let (c1, o1) = commit(&p, &v1, None).unwrap();
        let (c2, o2) = commit(&p, &v2, None).unwrap();
        let sum = c1.add(&c2).unwrap();
        assert!(verify_commitment(
            &p,
            sum.as_bytes(),
            &(v1 + v2),
            &(*o1.blinding() + o2.blinding())
        ));
    }

    #[test]
    fn format_validation() {
        let p = params();
        let (c, _) = commit(&p, &Scalar::ONE, None).unwrap();
        assert!(validate_format(&p, c.as_bytes()));
        assert!(!validate_format(&p, &c.as_bytes()[1..]));
        assert!(!validate_format(&p, &[0u8; 33]));
        assert!(!validate_format(&p, &[]));
        assert!(Commitment::from_bytes(c.as_bytes()).is_ok());
    }

    #[test]
    fn non_compressed_tags_fail_format_validation() {
        let p = params();
        let (c, _) = commit(&p, &Scalar::ONE, None).unwrap();
        let mut compact = *c.as_bytes();
        compact[0] = 0x05;
        assert!(!validate_format(&p, &compact));
        assert!(Commitment::from_bytes(&compact).is_err());
    }

    #[test]
    fn opening_debug_is_redacted() {
        let opening = Opening::new(Scalar::ONE, Scalar::ONE);
        assert_eq!(format!("{opening:?}"), "Opening([REDACTED])");
    }
}
