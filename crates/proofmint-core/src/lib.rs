//! proofmint Core - Shared types and membership verification
//!
//! This crate provides the foundational pieces of the proofmint allow-list
//! registry:
//! - Typed identities, hashes and token identifiers
//! - Keccak-256 leaf and node hashing
//! - The sorted-pair Merkle membership verifier
//! - A tree builder for producing allow-list roots and proofs

pub mod error;
pub mod hash;
pub mod tree;
pub mod types;
pub mod verifier;

pub use error::{CoreError, Result};
pub use hash::{hash_pair, keccak256, leaf_hash};
pub use tree::MerkleTree;
pub use types::{Address, Hash256, TokenId};
pub use verifier::{process_proof, verify};

/// Length of an identity in bytes
pub const ADDRESS_LEN: usize = 20;

/// Length of a hash value in bytes
pub const HASH_LEN: usize = 32;

/// First token identifier handed out by a registry
pub const FIRST_TOKEN_ID: u64 = 1;
