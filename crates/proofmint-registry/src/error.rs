//! Error types for the proofmint registry

use proofmint_core::{Address, CoreError, TokenId};
use thiserror::Error;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Broad class of a rejected call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A state or authorization precondition did not hold
    PreconditionViolation,
    /// The supplied proof does not establish membership
    VerificationFailure,
    /// Host-side persistence or configuration failure
    Storage,
}

/// Errors that can occur in registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Operation requires an initialized registry
    #[error("Registry not initialized - call initialize first")]
    NotInitialized,

    /// Initialization may only happen once
    #[error("Registry already initialized")]
    AlreadyInitialized,

    /// Caller is not the administrative authority
    #[error("Unauthorized: {caller} is not the administrative authority")]
    Unauthorized { caller: Address },

    /// No token with this identifier exists
    #[error("Token not found: {0}")]
    TokenNotFound(TokenId),

    /// Approving the current owner of a token
    #[error("Cannot approve current owner {owner} for token {token_id}")]
    ApprovalToCurrentOwner { token_id: TokenId, owner: Address },

    /// The null identity was supplied where a real one is required
    #[error("Zero address not allowed for {0}")]
    ZeroAddress(&'static str),

    /// Caller has already used its proof-gated mint
    #[error("Already minted: {0} has used its allow-list mint")]
    AlreadyMinted(Address),

    /// Committed root is the zero value
    #[error("Committed root is unset - proof-gated minting is halted")]
    RootUnset,

    /// Declared sender does not own the token
    #[error("Token {token_id} is owned by {owner}, not {from}")]
    NotTokenOwner {
        token_id: TokenId,
        from: Address,
        owner: Address,
    },

    /// Caller is neither owner, approved transferer, nor operator
    #[error("{caller} is not owner or approved for token {token_id}")]
    NotApprovedOrOwner { caller: Address, token_id: TokenId },

    /// Token identifier space exhausted
    #[error("Token identifier space exhausted")]
    TokenIdOverflow,

    /// Proof does not combine to the committed root
    #[error("Invalid membership proof for {0}")]
    InvalidProof(Address),

    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),
}

impl RegistryError {
    /// Classify the error
    pub fn category(&self) -> ErrorCategory {
        match self {
            RegistryError::InvalidProof(_) => ErrorCategory::VerificationFailure,
            RegistryError::Core(_)
            | RegistryError::Io(_)
            | RegistryError::Serialization(_)
            | RegistryError::Config(_) => ErrorCategory::Storage,
            _ => ErrorCategory::PreconditionViolation,
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(e: serde_json::Error) -> Self {
        RegistryError::Serialization(e.to_string())
    }
}
