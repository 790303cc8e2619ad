//! # Sigma Proof of Commitment Opening
//!
//! Non-interactive proof of knowledge of `(v, r)` such that
//! `C = v·G + r·H`, made non-interactive with Fiat-Shamir.
//!
//! ## Protocol
//!
//! ```text
//! Prover:   k_v, k_b  <-$ Z_n
//!           A  = k_v·G + k_b·H
//!           c  = SHA-256(DOMAIN || ctx_hash || C || A) mod n
//!           z_v = k_v + c·v
//!           z_b = k_b + c·r
//! Verifier: c' = SHA-256(DOMAIN || ctx_hash || C || A) mod n
//!           accept iff c == c' and z_v·G + z_b·H == A + c·C
//! ```
//!
//! Binding `ctx_hash` into the challenge ties the proof to one context; a
//! proof replayed under another context fails the challenge check.
//!
//! ## Verification
//!
//! [`verify_opening`] decodes and checks every input, folds each outcome
//! into one [`Choice`], and only converts to `bool` at the end.

use k256::elliptic_curve::Field;
use k256::Scalar;
use privp_core::Sha256Accumulator;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::encoding::{
    decode_point, decode_scalar, encode_point, encode_scalar, scalar_from_digest, POINT_BYTES,
    SCALAR_BYTES,
};
use crate::error::CryptoError;
use crate::params::CurveParameters;
use crate::pedersen::{Commitment, Opening};

/// Fiat-Shamir domain tag.
pub const CHALLENGE_DOMAIN: &[u8] = b"privp/sigma/commitment-opening/v1";

/// Length of the context hash bound into the challenge.
pub const CONTEXT_HASH_BYTES: usize = 32;

/// Length of the response `z_v || z_b`.
pub const RESPONSE_BYTES: usize = 2 * SCALAR_BYTES;

/// Encoded sigma proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningProof {
    /// Compressed ephemeral point `A`.
    pub ephemeral: [u8; POINT_BYTES],
    /// Challenge scalar `c`.
    pub challenge: [u8; SCALAR_BYTES],
    /// `z_v || z_b`.
    pub response: [u8; RESPONSE_BYTES],
}

#[derive(Zeroize, ZeroizeOnDrop)]
struct Nonces {
    k_v: Scalar,
    k_b: Scalar,
}

/// Fiat-Shamir challenge over the transcript.
pub fn compute_challenge(context_hash: &[u8], commitment: &[u8], ephemeral: &[u8]) -> Scalar {
    let mut acc = Sha256Accumulator::new(CHALLENGE_DOMAIN);
    acc.update(context_hash).update(commitment).update(ephemeral);
    scalar_from_digest(acc.finalize().as_bytes())
}

/// Prove knowledge of `opening` for `commitment`, bound to `context_hash`.
///
/// Nonces are drawn from [`OsRng`].
///
/// # Errors
///
/// Returns [`CryptoError::IdentityPoint`] if the ephemeral point is the
/// point at infinity, which requires both nonces to be zero.
pub fn prove_opening(
    params: &CurveParameters,
    commitment: &Commitment,
    opening: &Opening,
    context_hash: &[u8; CONTEXT_HASH_BYTES],
) -> Result<OpeningProof, CryptoError> {
    prove_opening_with_rng(params, commitment, opening, context_hash, &mut OsRng)
}

/// [`prove_opening`] with a caller-supplied RNG.
pub fn prove_opening_with_rng<R: RngCore + CryptoRng>(
    params: &CurveParameters,
    commitment: &Commitment,
    opening: &Opening,
    context_hash: &[u8; CONTEXT_HASH_BYTES],
    rng: &mut R,
) -> Result<OpeningProof, CryptoError> {
    let nonces = Nonces {
        k_v: Scalar::random(&mut *rng),
        k_b: Scalar::random(&mut *rng),
    };

    let ephemeral = encode_point(&(params.g() * nonces.k_v + params.h() * nonces.k_b))?;
    let c = compute_challenge(context_hash, commitment.as_bytes(), &ephemeral);

    let z_v = nonces.k_v + c * opening.value();
    let z_b = nonces.k_b + c * opening.blinding();

    let mut response = [0u8; RESPONSE_BYTES];
    response[..SCALAR_BYTES].copy_from_slice(&encode_scalar(&z_v));
    response[SCALAR_BYTES..].copy_from_slice(&encode_scalar(&z_b));

    Ok(OpeningProof {
        ephemeral,
        challenge: encode_scalar(&c),
        response,
    })
}

/// Verify an encoded opening proof.
///
/// Returns `true` only if every input has its exact length, both points
/// decode to non-identity points, every scalar is canonical, the stored
/// challenge equals the recomputed one, and the verification equation holds.
pub fn verify_opening(
    params: &CurveParameters,
    commitment: &[u8],
    context_hash: &[u8],
    ephemeral: &[u8],
    challenge: &[u8],
    response: &[u8],
) -> bool {
    let ctx_len_ok = Choice::from(u8::from(context_hash.len() == CONTEXT_HASH_BYTES));
    let resp_len_ok = Choice::from(u8::from(response.len() == RESPONSE_BYTES));

    let (c_point, c_ok) = decode_point(commitment);
    let (a_point, a_ok) = decode_point(ephemeral);
    let (c, chal_ok) = decode_scalar(challenge);
    let (z_v, zv_ok) = decode_scalar(response.get(..SCALAR_BYTES).unwrap_or(&[]));
    let (z_b, zb_ok) = decode_scalar(response.get(SCALAR_BYTES..).unwrap_or(&[]));

    let recomputed = compute_challenge(context_hash, commitment, ephemeral);
    let challenge_ok = recomputed.ct_eq(&c);

    let lhs = params.g() * z_v + params.h() * z_b;
    let rhs = a_point + c_point * c;
    let equation_ok = lhs.ct_eq(&rhs);

    let accepted = ctx_len_ok
        & resp_len_ok
        & c_ok
        & a_ok
        & chal_ok
        & zv_ok
        & zb_ok
        & challenge_ok
        & equation_ok;
    bool::from(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive_value;
    use crate::pedersen::commit;

    struct Fixture {
        params: CurveParameters,
        commitment: Commitment,
        ctx: [u8; 32],
        proof: OpeningProof,
    }

    fn fixture() -> Fixture {
        let params = CurveParameters::secp256k1();
        let (commitment, opening) = commit(&params, &derive_value("QmTest123"), None).unwrap();
        let ctx = [0x5a; 32];
        let proof = prove_opening(&params, &commitment, &opening, &ctx).unwrap();
        Fixture {
            params,
            commitment,
            ctx,
            proof,
        }
    }

    fn verify(f: &Fixture, commitment: &[u8], ctx: &[u8], a: &[u8], c: &[u8], z: &[u8]) -> bool {
        verify_opening(&f.params, commitment, ctx, a, c, z)
    }

    fn flip(bytes: &[u8], i: usize) -> Vec<u8> {
        let mut out = bytes.to_vec();
        out[i] ^= 0x01;
        out
    }

    #[test]
    fn honest_proof_verifies() {
        let f = fixture();
        let p = &f.proof;
        assert!(verify(&f, f.commitment.as_bytes(), &f.ctx, &p.ephemeral, &p.challenge, &p.response));
    }

    #[test]
    fn challenge_is_recomputable() {
        let f = fixture();
        let c = compute_challenge(&f.ctx, f.commitment.as_bytes(), &f.proof.ephemeral);
        assert_eq!(encode_scalar(&c), f.proof.challenge);
    }

    #[test]
    fn other_context_rejects() {
        let f = fixture();
        let p = &f.proof;
        let other = [0x5b; 32];
        assert!(!verify(&f, f.commitment.as_bytes(), &other, &p.ephemeral, &p.challenge, &p.response));
    }

    #[test]
    fn bit_flips_reject() {
        let f = fixture();
        let p = &f.proof;
        let c = f.commitment.as_bytes();
        for i in [0, 16, 32] {
            assert!(!verify(&f, &flip(c, i), &f.ctx, &p.ephemeral, &p.challenge, &p.response));
            assert!(!verify(&f, c, &f.ctx, &flip(&p.ephemeral, i), &p.challenge, &p.response));
        }
        for i in [0, 31] {
            assert!(!verify(&f, c, &f.ctx, &p.ephemeral, &flip(&p.challenge, i), &p.response));
            assert!(!verify(&f, c, &flip(&f.ctx, i), &p.ephemeral, &p.challenge, &p.response));
        }
        for i in [0, 31, 32, 63] {
            assert!(!verify(&f, c, &f.ctx, &p.ephemeral, &p.challenge, &flip(&p.response, i)));
        }
    }

    #[test]
    fn truncation_rejects() {
        let f = fixture();
        let p = &f.proof;
        let c = f.commitment.as_bytes();
        assert!(!verify(&f, &c[..32], &f.ctx, &p.ephemeral, &p.challenge, &p.response));
        assert!(!verify(&f, c, &f.ctx[..31], &p.ephemeral, &p.challenge, &p.response));
        assert!(!verify(&f, c, &f.ctx, &p.ephemeral[..32], &p.challenge, &p.response));
        assert!(!verify(&f, c, &f.ctx, &p.ephemeral, &p.challenge[..31], &p.response));
        assert!(!verify(&f, c, &f.ctx, &p.ephemeral, &p.challenge, &p.response[..63]));
    }

    #[test]
    fn extended_response_rejects() {
        let f = fixture();
        let p = &f.proof;
        let mut long = p.response.to_vec();
        long.push(0);
        assert!(!verify(&f, f.commitment.as_bytes(), &f.ctx, &p.ephemeral, &p.challenge, &long));
    }

    #[test]
    fn empty_inputs_reject() {
        let f = fixture();
        assert!(!verify(&f, &[], &[], &[], &[], &[]));
    }

    #[test]
    fn proof_for_other_commitment_rejects() {
        let f = fixture();
        let (other, _) = commit(&f.params, &derive_value("QmOther"), None).unwrap();
        let p = &f.proof;
        assert!(!verify(&f, other.as_bytes(), &f.ctx, &p.ephemeral, &p.challenge, &p.response));
    }

    #[test]
    fn nonces_are_fresh() {
        let params = CurveParameters::secp256k1();
        let (commitment, opening) = commit(&params, &derive_value("peer"), None).unwrap();
        let ctx = [0u8; 32];
        let a = prove_opening(&params, &commitment, &opening, &ctx).unwrap();
        let b = prove_opening(&params, &commitment, &opening, &ctx).unwrap();
        assert_ne!(a.ephemeral, b.ephemeral);
        assert_ne!(a.response, b.response);
    }
}
