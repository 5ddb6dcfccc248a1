//! Registry lifecycle and administrative configuration

use serde::{Deserialize, Serialize};

use proofmint_core::{Address, Hash256};

use crate::error::{RegistryError, Result};

/// Settings established by initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminState {
    /// Identity allowed to run administrative operations
    pub authority: Address,

    /// Root of the allow-list tree; zero halts proof-gated minting
    pub root: Hash256,
}

impl AdminState {
    /// Require `caller` to be the administrative authority
    pub fn ensure_authority(&self, caller: &Address) -> Result<()> {
        if *caller != self.authority {
            return Err(RegistryError::Unauthorized { caller: *caller });
        }
        Ok(())
    }
}

/// Global registry state
///
/// `Uninitialized -> Active` is the only transition; `Active` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Lifecycle {
    /// Deployed, waiting for the one-time initialize call
    #[default]
    Uninitialized,

    /// Initialized; authority and root are live
    Active(AdminState),
}

impl Lifecycle {
    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active(_))
    }

    /// Admin settings, or `NotInitialized`
    pub fn admin(&self) -> Result<&AdminState> {
        match self {
            Lifecycle::Active(admin) => Ok(admin),
            Lifecycle::Uninitialized => Err(RegistryError::NotInitialized),
        }
    }

    /// Mutable admin settings, or `NotInitialized`
    pub fn admin_mut(&mut self) -> Result<&mut AdminState> {
        match self {
            Lifecycle::Active(admin) => Ok(admin),
            Lifecycle::Uninitialized => Err(RegistryError::NotInitialized),
        }
    }

    /// Perform the one-way latch; the authority must be a real identity
    pub fn activate(&mut self, authority: Address, root: Hash256) -> Result<()> {
        if self.is_active() {
            return Err(RegistryError::AlreadyInitialized);
        }
        if authority.is_zero() {
            return Err(RegistryError::ZeroAddress("authority"));
        }
        *self = Lifecycle::Active(AdminState { authority, root });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_once() {
        let mut lifecycle = Lifecycle::default();
        assert!(matches!(
            lifecycle.admin(),
            Err(RegistryError::NotInitialized)
        ));

        let authority = Address::new([1; 20]);
        lifecycle.activate(authority, Hash256::new([2; 32])).unwrap();
        assert_eq!(lifecycle.admin().unwrap().authority, authority);

        let again = lifecycle.activate(Address::new([3; 20]), Hash256::ZERO);
        assert!(matches!(again, Err(RegistryError::AlreadyInitialized)));
        assert_eq!(lifecycle.admin().unwrap().authority, authority);
    }

    #[test]
    fn test_activate_rejects_zero_authority() {
        let mut lifecycle = Lifecycle::default();
        let err = lifecycle
            .activate(Address::ZERO, Hash256::new([2; 32]))
            .unwrap_err();

        assert!(matches!(err, RegistryError::ZeroAddress("authority")));
        assert!(!lifecycle.is_active());
    }

    #[test]
    fn test_ensure_authority() {
        let admin = AdminState {
            authority: Address::new([1; 20]),
            root: Hash256::ZERO,
        };
        assert!(admin.ensure_authority(&Address::new([1; 20])).is_ok());
        assert!(matches!(
            admin.ensure_authority(&Address::new([2; 20])),
            Err(RegistryError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_string(&Lifecycle::Uninitialized).unwrap();
        assert_eq!(json, r#"{"state":"uninitialized"}"#);

        let active = Lifecycle::Active(AdminState {
            authority: Address::new([1; 20]),
            root: Hash256::new([2; 32]),
        });
        let back: Lifecycle =
            serde_json::from_str(&serde_json::to_string(&active).unwrap()).unwrap();
        assert_eq!(back, active);
    }
}
