//! Allow-list Merkle tree builder
//!
//! Produces roots and proofs in the shape [`crate::verifier::verify`]
//! accepts. Leaves are sorted and de-duplicated, parents are
//! `hash_pair(left, right)`, and an odd trailing node is promoted to the
//! next level unchanged.

use crate::error::{CoreError, Result};
use crate::hash::{hash_pair, leaf_hash};
use crate::types::{Address, Hash256};

/// Sorted-pair Keccak Merkle tree over a set of leaf hashes
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// All nodes in the tree, level by level (leaves first)
    levels: Vec<Vec<Hash256>>,
}

impl MerkleTree {
    /// Build a tree over the leaf hashes of a list of identities
    pub fn from_identities(identities: &[Address]) -> Result<Self> {
        let leaves: Vec<Hash256> = identities.iter().map(leaf_hash).collect();
        Self::from_leaves(&leaves)
    }

    /// Build a tree from precomputed leaf hashes
    pub fn from_leaves(leaves: &[Hash256]) -> Result<Self> {
        if leaves.is_empty() {
            return Err(CoreError::EmptyTree);
        }

        let mut level0 = leaves.to_vec();
        level0.sort_unstable();
        level0.dedup();

        let mut levels = vec![level0];
        loop {
            let current = &levels[levels.len() - 1];
            if current.len() <= 1 {
                break;
            }
            let next: Vec<Hash256> = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(left, right),
                    _ => pair[0],
                })
                .collect();
            levels.push(next);
        }

        Ok(Self { levels })
    }

    /// The committed root
    pub fn root(&self) -> Hash256 {
        self.levels[self.levels.len() - 1][0]
    }

    /// Number of distinct leaves
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of hashing levels above the leaves
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Sorted leaf hashes
    pub fn leaves(&self) -> &[Hash256] {
        &self.levels[0]
    }

    /// Check whether a leaf is in the tree
    pub fn contains(&self, leaf: &Hash256) -> bool {
        self.levels[0].binary_search(leaf).is_ok()
    }

    /// Sibling path from `leaf` to the root
    pub fn proof(&self, leaf: &Hash256) -> Result<Vec<Hash256>> {
        let mut index = self.levels[0]
            .binary_search(leaf)
            .map_err(|_| CoreError::LeafNotFound(leaf.to_hex()))?;

        let mut proof = Vec::with_capacity(self.depth());
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = index ^ 1;
            // A promoted odd node has no sibling at this level
            if sibling < level.len() {
                proof.push(level[sibling]);
            }
            index /= 2;
        }

        Ok(proof)
    }

    /// Sibling path for an identity's leaf
    pub fn proof_for(&self, identity: &Address) -> Result<Vec<Hash256>> {
        self.proof(&leaf_hash(identity))
    }
}
