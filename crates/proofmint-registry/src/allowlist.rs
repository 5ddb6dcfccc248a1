//! Allow-list files and proof bundles
//!
//! Reads a plain-text list of identities and exports the committed root
//! together with each member's proof, for handing out to minters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use proofmint_core::{leaf_hash, Address, Hash256, MerkleTree};

use crate::error::{RegistryError, Result};

/// Parse one address per line; blank lines and `#` comments are skipped
///
/// The zero address can never mint, so listing it is an error.
pub fn parse_allow_list(text: &str) -> Result<Vec<Address>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let member = Address::from_hex(line)?;
            if member.is_zero() {
                return Err(RegistryError::ZeroAddress("allow-list member"));
            }
            Ok(member)
        })
        .collect()
}

/// Root and per-member proofs for an allow-list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle {
    pub root: Hash256,
    pub depth: usize,
    /// Keyed by member address
    pub proofs: BTreeMap<Address, MemberProof>,
}

/// A single member's entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProof {
    pub leaf: Hash256,
    pub proof: Vec<Hash256>,
}

impl ProofBundle {
    /// Build the tree and collect every member's proof
    pub fn build(members: &[Address]) -> Result<Self> {
        let tree = MerkleTree::from_identities(members)?;

        let mut proofs = BTreeMap::new();
        for member in members {
            let proof = tree.proof_for(member)?;
            proofs.insert(
                *member,
                MemberProof {
                    leaf: leaf_hash(member),
                    proof,
                },
            );
        }

        Ok(Self {
            root: tree.root(),
            depth: tree.depth(),
            proofs,
        })
    }

    pub fn proof_for(&self, member: &Address) -> Option<&[Hash256]> {
        self.proofs.get(member).map(|entry| entry.proof.as_slice())
    }
}
