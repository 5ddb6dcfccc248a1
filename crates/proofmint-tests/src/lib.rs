//! Shared fixtures for proofmint integration tests

use proofmint_core::Address;

/// Deterministic test identity
pub fn identity(tag: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xa0;
    bytes[19] = tag;
    Address::new(bytes)
}
