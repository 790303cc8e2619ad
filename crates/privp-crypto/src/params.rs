//! # Curve Parameters
//!
//! Group parameters for Pedersen commitments over secp256k1. The second
//! generator `H` is derived by try-and-increment hash-to-curve from a fixed
//! domain tag, so nobody knows `log_G(H)`.
//!
//! A process-wide cache hands out one shared [`CurveParameters`]. Callers
//! that want explicit control construct their own with
//! [`CurveParameters::secp256k1`] and inject it.

use std::sync::Arc;

use k256::elliptic_curve::sec1::FromEncodedPoint;
use k256::{EncodedPoint, ProjectivePoint};
use parking_lot::RwLock;
use privp_core::Sha256Accumulator;

use crate::encoding::{POINT_BYTES, SCALAR_BYTES};

/// Curve identifier carried in proofs.
pub const CURVE_NAME: &str = "secp256k1";

/// Domain tag for deriving the generator `H`.
pub const GENERATOR_H_DOMAIN: &[u8] = b"privp/pedersen/generator-H/v1";

/// secp256k1 group order `n`, big-endian.
pub const SECP256K1_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// Immutable group parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveParameters {
    curve_name: &'static str,
    order: [u8; 32],
    g: ProjectivePoint,
    h: ProjectivePoint,
    h_counter: u64,
}

impl CurveParameters {
    /// Build secp256k1 parameters, deriving `H`.
    pub fn secp256k1() -> Self {
        let (h, h_counter) = hash_to_curve(GENERATOR_H_DOMAIN);
        Self {
            curve_name: CURVE_NAME,
            order: SECP256K1_ORDER,
            g: ProjectivePoint::GENERATOR,
            h,
            h_counter,
        }
    }

    pub fn curve_name(&self) -> &str {
        self.curve_name
    }

    /// Group order, big-endian.
    pub fn order(&self) -> &[u8; 32] {
        &self.order
    }

    /// The standard base point.
    pub fn g(&self) -> ProjectivePoint {
        self.g
    }

    /// The nothing-up-my-sleeve second generator.
    pub fn h(&self) -> ProjectivePoint {
        self.h
    }

    /// Counter value at which hash-to-curve found `H`.
    pub fn h_counter(&self) -> u64 {
        self.h_counter
    }

    pub fn scalar_bytes(&self) -> usize {
        SCALAR_BYTES
    }

    pub fn point_bytes(&self) -> usize {
        POINT_BYTES
    }
}

/// Try-and-increment: hash `domain || counter`, prefix `0x02`, and take the
/// first candidate that decompresses to a curve point.
///
/// Roughly half of all x-coordinates lie on the curve, so this terminates
/// after a couple of iterations.
fn hash_to_curve(domain: &[u8]) -> (ProjectivePoint, u64) {
    let mut counter: u64 = 0;
    loop {
        let mut acc = Sha256Accumulator::new(domain);
        acc.update(&counter.to_be_bytes());
        let x = acc.finalize();

        let mut candidate = [0u8; POINT_BYTES];
        candidate[0] = 0x02;
        candidate[1..].copy_from_slice(x.as_bytes());

        if let Ok(encoded) = EncodedPoint::from_bytes(candidate) {
            let point: Option<ProjectivePoint> =
                ProjectivePoint::from_encoded_point(&encoded).into();
            if let Some(point) = point {
                return (point, counter);
            }
        }
        counter = counter.wrapping_add(1);
    }
}

static PARAMETERS: RwLock<Option<Arc<CurveParameters>>> = parking_lot::const_rwlock(None);

/// The shared parameters, built on first use.
///
/// Concurrent first callers all receive the same `Arc`.
pub fn get_parameters() -> Arc<CurveParameters> {
    if let Some(params) = PARAMETERS.read().as_ref() {
        return Arc::clone(params);
    }

    let mut slot = PARAMETERS.write();
    if let Some(params) = slot.as_ref() {
        return Arc::clone(params);
    }
    let params = Arc::new(CurveParameters::secp256k1());
    tracing::debug!(
        curve = params.curve_name(),
        h_counter = params.h_counter(),
        "curve parameters initialized"
    );
    *slot = Some(Arc::clone(&params));
    params
}

/// Drop the cached parameters so the next [`get_parameters`] rebuilds them.
#[cfg(any(test, feature = "test-support"))]
pub fn clear_cache() {
    *PARAMETERS.write() = None;
}
