//! Registry notifications
//!
//! Every successful mutating call appends its notification to the
//! registry's ordered log. Rejected calls append nothing.

use serde::{Deserialize, Serialize};

use proofmint_core::{Address, Hash256, TokenId};

/// A notification emitted by a successful registry operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// The registry was initialized
    Initialized { authority: Address, root: Hash256 },

    /// The committed root was replaced
    RootChanged { old: Hash256, new: Hash256 },

    /// A token was minted (`from` is `None`) or transferred
    OwnershipChanged {
        from: Option<Address>,
        to: Address,
        token_id: TokenId,
    },

    /// A per-token transferer was set (zero address clears it)
    ApprovalGranted {
        owner: Address,
        approved: Address,
        token_id: TokenId,
    },

    /// A blanket operator approval was set or cleared
    OperatorApprovalSet {
        owner: Address,
        operator: Address,
        approved: bool,
    },
}

impl RegistryEvent {
    /// Short name for display
    pub fn name(&self) -> &'static str {
        match self {
            RegistryEvent::Initialized { .. } => "initialized",
            RegistryEvent::RootChanged { .. } => "root_changed",
            RegistryEvent::OwnershipChanged { .. } => "ownership_changed",
            RegistryEvent::ApprovalGranted { .. } => "approval_granted",
            RegistryEvent::OperatorApprovalSet { .. } => "operator_approval_set",
        }
    }

    /// Token the event refers to, if any
    pub fn token_id(&self) -> Option<TokenId> {
        match self {
            RegistryEvent::OwnershipChanged { token_id, .. }
            | RegistryEvent::ApprovalGranted { token_id, .. } => Some(*token_id),
            _ => None,
        }
    }
}
