#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use proofmint_core::{Address, Hash256, MerkleTree, TokenId};
use proofmint_registry::Registry;

#[derive(Debug, Arbitrary)]
enum Op {
    Initialize { caller: u8 },
    Mint { caller: u8, proof_of: u8 },
    AdminMint { caller: u8, to: u8 },
    Approve { caller: u8, to: u8, token: u8 },
    SetOperator { caller: u8, operator: u8, approved: bool },
    Transfer { caller: u8, from: u8, to: u8, token: u8 },
    UpdateRoot { caller: u8, zero: bool },
    TransferAuthority { caller: u8, to: u8 },
}

// Identity 0 is the null address; 1..=4 are on the allow-list
fn addr(n: u8) -> Address {
    Address::new([n % 8; 20])
}

fuzz_target!(|ops: Vec<Op>| {
    let members: Vec<Address> = (1..=4).map(addr).collect();
    let tree = MerkleTree::from_identities(&members).unwrap();
    let mut registry = Registry::default();

    for op in ops.iter().take(256) {
        let before = registry.clone();
        let result = match *op {
            Op::Initialize { caller } => registry.initialize(addr(caller), tree.root()),
            Op::Mint { caller, proof_of } => {
                let proof = tree.proof_for(&addr(proof_of)).unwrap_or_default();
                registry.mint_by_proof(addr(caller), &proof, "uri").map(|_| ())
            }
            Op::AdminMint { caller, to } => {
                registry.admin_mint(addr(caller), addr(to), "uri").map(|_| ())
            }
            Op::Approve { caller, to, token } => {
                registry.approve(addr(caller), addr(to), TokenId(u64::from(token % 16)))
            }
            Op::SetOperator { caller, operator, approved } => {
                registry.set_operator_approval(addr(caller), addr(operator), approved)
            }
            Op::Transfer { caller, from, to, token } => registry.transfer(
                addr(caller),
                addr(from),
                addr(to),
                TokenId(u64::from(token % 16)),
            ),
            Op::UpdateRoot { caller, zero } => {
                let root = if zero { Hash256::ZERO } else { tree.root() };
                registry.update_root(addr(caller), root)
            }
            Op::TransferAuthority { caller, to } => {
                registry.transfer_authority(addr(caller), addr(to))
            }
        };

        if result.is_err() {
            assert_eq!(registry, before);
        }

        assert!(registry.check_consistency().is_ok());

        // Ownership index matches token records
        let mut total = 0u64;
        for n in 1..8u8 {
            total += registry.balance_of(&addr(n)).unwrap();
        }
        assert_eq!(total, registry.total_supply());
        for id in 1..=registry.total_supply() {
            assert!(!registry.owner_of(TokenId(id)).unwrap().is_zero());
        }
    }
});
