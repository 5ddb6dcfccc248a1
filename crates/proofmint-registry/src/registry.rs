//! Allow-list gated token registry
//!
//! Owns all registry state and is its only writer. Each mutating operation
//! validates every precondition before its first write, so a rejected call
//! leaves the state, including the event log, exactly as it was.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

use proofmint_core::{leaf_hash, verify, Address, Hash256, TokenId, FIRST_TOKEN_ID};

use crate::error::{RegistryError, Result};
use crate::events::RegistryEvent;
use crate::lifecycle::{AdminState, Lifecycle};

/// Collection name and symbol, fixed when the registry is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub symbol: String,
}

impl Default for CollectionInfo {
    fn default() -> Self {
        Self {
            name: "proofmint".to_string(),
            symbol: "PMT".to_string(),
        }
    }
}

/// A single token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Current owner (never the zero address)
    pub owner: Address,

    /// Identity allowed to transfer this one token
    pub approved: Option<Address>,

    /// Metadata URI, set at mint
    pub metadata_uri: String,
}

/// Registry of allow-list minted tokens
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Registry {
    collection: CollectionInfo,

    lifecycle: Lifecycle,

    /// Identities that have completed a proof-gated mint
    minted: HashSet<Address>,

    /// Number of tokens ever minted; also the last allocated id
    total_minted: u64,

    tokens: BTreeMap<TokenId, TokenRecord>,

    balances: HashMap<Address, u64>,

    /// Owner -> operators with blanket approval
    operators: HashMap<Address, HashSet<Address>>,

    events: Vec<RegistryEvent>,
}

impl Registry {
    /// Create an uninitialized registry
    pub fn new(collection: CollectionInfo) -> Self {
        Self {
            collection,
            ..Default::default()
        }
    }

    // ============================================
    // Initialization and administration
    // ============================================

    /// One-time initialization: `caller` becomes the authority
    pub fn initialize(&mut self, caller: Address, root: Hash256) -> Result<()> {
        self.lifecycle
            .activate(caller, root)
            .inspect_err(|e| log_rejection("initialize", &caller, e))?;

        self.events.push(RegistryEvent::Initialized {
            authority: caller,
            root,
        });
        info!("Registry initialized by {} with root {}", caller, root);
        Ok(())
    }

    /// Replace the committed root (authority only)
    ///
    /// Setting the zero root halts proof-gated minting.
    pub fn update_root(&mut self, caller: Address, new_root: Hash256) -> Result<()> {
        let admin = self
            .authorized_admin(&caller)
            .inspect_err(|e| log_rejection("update_root", &caller, e))?;

        let old = std::mem::replace(&mut admin.root, new_root);
        self.events.push(RegistryEvent::RootChanged { old, new: new_root });
        info!("Committed root changed from {} to {}", old, new_root);
        Ok(())
    }

    /// Hand the authority role to another identity (authority only)
    pub fn transfer_authority(&mut self, caller: Address, new_authority: Address) -> Result<()> {
        let checked = self.authorized_admin(&caller).and_then(|admin| {
            if new_authority.is_zero() {
                return Err(RegistryError::ZeroAddress("new authority"));
            }
            Ok(admin)
        });
        let admin = checked.inspect_err(|e| log_rejection("transfer_authority", &caller, e))?;

        admin.authority = new_authority;
        info!("Administrative authority moved from {} to {}", caller, new_authority);
        Ok(())
    }

    fn authorized_admin(&mut self, caller: &Address) -> Result<&mut AdminState> {
        let admin = self.lifecycle.admin_mut()?;
        admin.ensure_authority(caller)?;
        Ok(admin)
    }

    // ============================================
    // Minting
    // ============================================

    /// Mint one token to `caller` if its proof shows allow-list membership
    ///
    /// Each identity may succeed at most once.
    pub fn mint_by_proof(
        &mut self,
        caller: Address,
        proof: &[Hash256],
        metadata_uri: impl Into<String>,
    ) -> Result<TokenId> {
        let token_id = self
            .check_proof_mint(&caller, proof)
            .inspect_err(|e| log_rejection("mint_by_proof", &caller, e))?;

        self.minted.insert(caller);
        self.assign_new_token(token_id, caller, metadata_uri.into());
        info!("Allow-list mint of token {} to {}", token_id, caller);
        Ok(token_id)
    }

    fn check_proof_mint(&self, caller: &Address, proof: &[Hash256]) -> Result<TokenId> {
        let admin = self.lifecycle.admin()?;
        if caller.is_zero() {
            return Err(RegistryError::ZeroAddress("minter"));
        }
        if self.minted.contains(caller) {
            return Err(RegistryError::AlreadyMinted(*caller));
        }
        if admin.root.is_zero() {
            return Err(RegistryError::RootUnset);
        }
        if !verify(&leaf_hash(caller), proof, &admin.root) {
            return Err(RegistryError::InvalidProof(*caller));
        }
        self.next_token_id()
    }

    /// Issue a token outside the allow-list (authority only)
    ///
    /// Neither reads nor sets the recipient's allow-list mint flag.
    pub fn admin_mint(
        &mut self,
        caller: Address,
        to: Address,
        metadata_uri: impl Into<String>,
    ) -> Result<TokenId> {
        let token_id = self
            .check_admin_mint(&caller, &to)
            .inspect_err(|e| log_rejection("admin_mint", &caller, e))?;

        self.assign_new_token(token_id, to, metadata_uri.into());
        info!("Admin mint of token {} to {}", token_id, to);
        Ok(token_id)
    }

    fn check_admin_mint(&self, caller: &Address, to: &Address) -> Result<TokenId> {
        self.lifecycle.admin()?.ensure_authority(caller)?;
        if to.is_zero() {
            return Err(RegistryError::ZeroAddress("mint recipient"));
        }
        self.next_token_id()
    }

    fn next_token_id(&self) -> Result<TokenId> {
        self.total_minted
            .checked_add(FIRST_TOKEN_ID)
            .map(TokenId)
            .ok_or(RegistryError::TokenIdOverflow)
    }

    /// Shared allocate-and-assign step; callers have already validated
    fn assign_new_token(&mut self, token_id: TokenId, to: Address, metadata_uri: String) {
        self.tokens.insert(
            token_id,
            TokenRecord {
                owner: to,
                approved: None,
                metadata_uri,
            },
        );
        *self.balances.entry(to).or_default() += 1;
        self.total_minted = token_id.value();
        self.events.push(RegistryEvent::OwnershipChanged {
            from: None,
            to,
            token_id,
        });
    }

    // ============================================
    // Approvals and transfers
    // ============================================

    /// Set the single approved transferer of a token
    ///
    /// Caller must be the owner or one of its operators. Approving the zero
    /// address clears the slot.
    pub fn approve(&mut self, caller: Address, to: Address, token_id: TokenId) -> Result<()> {
        let owner = self
            .check_approve(&caller, &to, token_id)
            .inspect_err(|e| log_rejection("approve", &caller, e))?;

        if let Some(token) = self.tokens.get_mut(&token_id) {
            token.approved = (!to.is_zero()).then_some(to);
        }
        self.events.push(RegistryEvent::ApprovalGranted {
            owner,
            approved: to,
            token_id,
        });
        debug!("Token {} approved for {}", token_id, to);
        Ok(())
    }

    fn check_approve(&self, caller: &Address, to: &Address, token_id: TokenId) -> Result<Address> {
        self.lifecycle.admin()?;
        let owner = self.token(token_id)?.owner;
        if *to == owner {
            return Err(RegistryError::ApprovalToCurrentOwner { token_id, owner });
        }
        if *caller != owner && !self.is_operator(&owner, caller) {
            return Err(RegistryError::NotApprovedOrOwner {
                caller: *caller,
                token_id,
            });
        }
        Ok(owner)
    }

    /// Grant or revoke blanket approval over all of `caller`'s tokens
    pub fn set_operator_approval(
        &mut self,
        caller: Address,
        operator: Address,
        approved: bool,
    ) -> Result<()> {
        self.lifecycle
            .admin()
            .inspect_err(|e| log_rejection("set_operator_approval", &caller, e))?;

        if approved {
            self.operators.entry(caller).or_default().insert(operator);
        } else if let Some(set) = self.operators.get_mut(&caller) {
            set.remove(&operator);
        }
        self.events.push(RegistryEvent::OperatorApprovalSet {
            owner: caller,
            operator,
            approved,
        });
        debug!("Operator {} for {} set to {}", operator, caller, approved);
        Ok(())
    }

    /// Move a token from `from` to `to`
    ///
    /// Authorization is checked against the token's actual owner, and
    /// `from` must match that owner.
    pub fn transfer(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        token_id: TokenId,
    ) -> Result<()> {
        self.check_transfer(&caller, &from, &to, token_id)
            .inspect_err(|e| log_rejection("transfer", &caller, e))?;

        if let Some(token) = self.tokens.get_mut(&token_id) {
            token.approved = None;
            token.owner = to;
        }
        if let Some(balance) = self.balances.get_mut(&from) {
            *balance -= 1;
        }
        *self.balances.entry(to).or_default() += 1;
        self.events.push(RegistryEvent::OwnershipChanged {
            from: Some(from),
            to,
            token_id,
        });
        info!("Token {} transferred from {} to {}", token_id, from, to);
        Ok(())
    }

    fn check_transfer(
        &self,
        caller: &Address,
        from: &Address,
        to: &Address,
        token_id: TokenId,
    ) -> Result<()> {
        self.lifecycle.admin()?;
        let token = self.token(token_id)?;
        let owner = token.owner;

        let authorized = *caller == owner
            || token.approved == Some(*caller)
            || self.is_operator(&owner, caller);
        if !authorized {
            return Err(RegistryError::NotApprovedOrOwner {
                caller: *caller,
                token_id,
            });
        }
        if owner != *from {
            return Err(RegistryError::NotTokenOwner {
                token_id,
                from: *from,
                owner,
            });
        }
        if to.is_zero() {
            return Err(RegistryError::ZeroAddress("transfer recipient"));
        }
        Ok(())
    }

    // ============================================
    // Queries
    // ============================================

    /// Check allow-list membership without consuming a mint
    pub fn is_member(&self, identity: &Address, proof: &[Hash256]) -> bool {
        match self.lifecycle.admin() {
            Ok(admin) if !admin.root.is_zero() => {
                verify(&leaf_hash(identity), proof, &admin.root)
            }
            _ => false,
        }
    }

    pub fn owner_of(&self, token_id: TokenId) -> Result<Address> {
        Ok(self.token(token_id)?.owner)
    }

    pub fn balance_of(&self, identity: &Address) -> Result<u64> {
        if identity.is_zero() {
            return Err(RegistryError::ZeroAddress("balance query"));
        }
        Ok(self.balances.get(identity).copied().unwrap_or(0))
    }

    pub fn token_metadata(&self, token_id: TokenId) -> Result<&str> {
        Ok(self.token(token_id)?.metadata_uri.as_str())
    }

    /// Current approved transferer of a token
    pub fn approved(&self, token_id: TokenId) -> Result<Option<Address>> {
        Ok(self.token(token_id)?.approved)
    }

    pub fn is_operator(&self, owner: &Address, operator: &Address) -> bool {
        self.operators
            .get(owner)
            .is_some_and(|set| set.contains(operator))
    }

    /// Whether `identity` has used its allow-list mint
    pub fn has_minted(&self, identity: &Address) -> bool {
        self.minted.contains(identity)
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle.is_active()
    }

    pub fn root(&self) -> Option<Hash256> {
        self.lifecycle.admin().ok().map(|admin| admin.root)
    }

    pub fn authority(&self) -> Option<Address> {
        self.lifecycle.admin().ok().map(|admin| admin.authority)
    }

    /// Number of tokens minted so far
    pub fn total_supply(&self) -> u64 {
        self.total_minted
    }

    pub fn collection(&self) -> &CollectionInfo {
        &self.collection
    }

    /// Ordered notification log
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    fn token(&self, token_id: TokenId) -> Result<&TokenRecord> {
        self.tokens
            .get(&token_id)
            .ok_or(RegistryError::TokenNotFound(token_id))
    }

    // ============================================
    // Snapshot checks
    // ============================================

    /// Check that a loaded snapshot upholds the registry invariants
    ///
    /// Token ids must run contiguously up to the total supply, owners and
    /// the authority must be real identities, and the balance index must
    /// agree with the token records.
    pub fn check_consistency(&self) -> Result<()> {
        match self.lifecycle.admin() {
            Ok(admin) if admin.authority.is_zero() => {
                return Err(inconsistent("authority is the zero address"));
            }
            Ok(_) => {}
            Err(_) if !self.tokens.is_empty() || !self.events.is_empty() => {
                return Err(inconsistent("uninitialized registry holds tokens or events"));
            }
            Err(_) => {}
        }

        let expected_ids = (FIRST_TOKEN_ID..=self.total_minted).map(TokenId);
        if !self.tokens.keys().copied().eq(expected_ids) {
            return Err(inconsistent(format!(
                "token ids do not run from {} to {}",
                FIRST_TOKEN_ID, self.total_minted
            )));
        }

        let mut counted: HashMap<Address, u64> = HashMap::new();
        for (token_id, token) in &self.tokens {
            if token.owner.is_zero() {
                return Err(inconsistent(format!(
                    "token {} is owned by the zero address",
                    token_id
                )));
            }
            *counted.entry(token.owner).or_default() += 1;
        }
        let indexed = self.balances.values().filter(|n| **n > 0).count();
        if indexed != counted.len()
            || counted
                .iter()
                .any(|(owner, n)| self.balances.get(owner) != Some(n))
        {
            return Err(inconsistent("balance index disagrees with token records"));
        }

        if self.minted.iter().any(Address::is_zero) {
            return Err(inconsistent("zero address recorded as minted"));
        }
        Ok(())
    }
}

fn inconsistent(detail: impl std::fmt::Display) -> RegistryError {
    RegistryError::Serialization(format!("inconsistent snapshot: {}", detail))
}

fn log_rejection(op: &str, caller: &Address, err: &RegistryError) {
    match err {
        RegistryError::InvalidProof(_) => warn!("{} by {} rejected: {}", op, caller, err),
        _ => debug!("{} by {} rejected: {}", op, caller, err),
    }
}
