//! Keccak-256 hashing for leaves and tree nodes

use sha3::{Digest, Keccak256};

use crate::types::{Address, Hash256};

/// Keccak-256 of arbitrary bytes
pub fn keccak256(data: &[u8]) -> Hash256 {
    Hash256(Keccak256::digest(data).into())
}

/// Leaf hash of an identity: `keccak256(address_bytes)`
pub fn leaf_hash(identity: &Address) -> Hash256 {
    keccak256(identity.as_bytes())
}

/// Combine two nodes into their parent
///
/// The pair is ordered numerically before hashing, so
/// `hash_pair(a, b) == hash_pair(b, a)` and proofs do not need to carry
/// left/right position bits.
pub fn hash_pair(a: &Hash256, b: &Hash256) -> Hash256 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Keccak256::new();
    hasher.update(lo.as_bytes());
    hasher.update(hi.as_bytes());
    Hash256(hasher.finalize().into())
}
