//! Parameter cache lifecycle as seen by backends. Kept in its own test
//! binary because it clears the process-wide cache.

use std::sync::Arc;

use privp_core::ProofContext;
use privp_crypto::{get_parameters, params::clear_cache};
use privp_zkp::{PedersenBackend, ProofBackend};

#[test]
fn backends_share_and_survive_cache_resets() {
    let first = PedersenBackend::new();
    let second = PedersenBackend::new();
    assert!(Arc::ptr_eq(first.params(), second.params()));
    assert!(Arc::ptr_eq(first.params(), &get_parameters()));

    let proof = first
        .generate_commitment_opening_proof(&ProofContext::new("QmCache", "session_cache"))
        .unwrap();

    clear_cache();
    let rebuilt = PedersenBackend::new();
    assert!(!Arc::ptr_eq(first.params(), rebuilt.params()));
    assert_eq!(first.params().h(), rebuilt.params().h());
    assert_eq!(first.params().h_counter(), rebuilt.params().h_counter());
    assert!(rebuilt.verify_proof(&proof, None));
}
