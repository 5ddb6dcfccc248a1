//! Error types for the proofmint core library

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while parsing primitives or building trees
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Input was not valid hex
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded value had the wrong number of bytes
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// A tree needs at least one leaf
    #[error("Cannot build a Merkle tree with no leaves")]
    EmptyTree,

    /// Requested a proof for a leaf the tree does not contain
    #[error("Leaf not in tree: {0}")]
    LeafNotFound(String),
}

impl From<hex::FromHexError> for CoreError {
    fn from(e: hex::FromHexError) -> Self {
        CoreError::InvalidHex(e.to_string())
    }
}
