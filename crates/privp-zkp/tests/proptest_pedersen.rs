//! Property tests over arbitrary identifiers and tamper positions.

use privp_core::{ProofContext, Timestamp, ZKProof};
use privp_zkp::{PedersenBackend, ProofBackend};
use proptest::prelude::*;

fn ctx(peer: &str, session: &str) -> ProofContext {
    ProofContext::new(peer, session).with_timestamp(Timestamp::from_epoch_secs(1_768_478_400).unwrap())
}

fn proof_for(peer: &str, session: &str) -> ZKProof {
    PedersenBackend::new()
        .generate_commitment_opening_proof(&ctx(peer, session))
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn any_nonempty_identity_proves(peer in "\\PC{1,64}", session in "[a-z0-9_]{1,32}") {
        let backend = PedersenBackend::new();
        let proof = proof_for(&peer, &session);
        prop_assert!(backend.verify_proof(&proof, None));
    }

    #[test]
    fn any_single_bit_flip_rejects(index in 0usize..(33 + 32 + 64), bit in 0u8..8) {
        let backend = PedersenBackend::new();
        let mut proof = proof_for("QmProp", "session_prop");
        let mask = 1u8 << bit;
        match index {
            i if i < 33 => proof.commitment[i] ^= mask,
            i if i < 65 => proof.challenge[i - 33] ^= mask,
            i => proof.response[i - 65] ^= mask,
        }
        prop_assert!(!backend.verify_proof(&proof, None));
    }

    #[test]
    fn proofs_are_bound_to_their_session(a in "[a-z]{1,16}", b in "[a-z]{1,16}") {
        prop_assume!(a != b);
        let backend = PedersenBackend::new();
        let proof = proof_for("QmProp", &a);
        prop_assert!(backend.verify_proof_for_context(&proof, &ctx("QmProp", &a)));
        prop_assert!(!backend.verify_proof_for_context(&proof, &ctx("QmProp", &b)));
    }
}
