//! Merkle membership verification
//!
//! Stateless check that a leaf belongs to the set committed to by a root.
//! Proofs are plain sibling lists; positions are implied by the sorted-pair
//! node rule in [`hash_pair`].

use crate::hash::hash_pair;
use crate::types::Hash256;

/// Recompute the root implied by `leaf` and its sibling path
pub fn process_proof(leaf: &Hash256, proof: &[Hash256]) -> Hash256 {
    proof
        .iter()
        .fold(*leaf, |computed, sibling| hash_pair(&computed, sibling))
}

/// Check that `leaf` is a member of the tree committed to by `root`
///
/// An empty proof succeeds only when the leaf is the root itself.
/// Returns `false` for any mismatch; a malformed proof and a proof for a
/// different leaf are indistinguishable.
pub fn verify(leaf: &Hash256, proof: &[Hash256], root: &Hash256) -> bool {
    process_proof(leaf, proof) == *root
}
