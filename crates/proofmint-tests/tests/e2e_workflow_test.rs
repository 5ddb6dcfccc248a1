//! End-to-end workflow tests for proofmint
//!
//! These tests drive the registry the way a host would: build an
//! allow-list, initialize, mint, delegate and transfer, persisting between
//! calls.

use proofmint_core::{leaf_hash, verify, Address, Hash256, MerkleTree, TokenId};
use proofmint_registry::{
    parse_allow_list, CollectionInfo, ErrorCategory, ProofBundle, Registry, RegistryError,
    RegistryEvent, RegistryStorage,
};
use proofmint_tests::identity;

/// The reference scenario: allow-list {X, Y}, authority A, outsider Z
#[test]
fn test_allow_list_mint_scenario() {
    let authority = identity(0xad);
    let x = identity(1);
    let y = identity(2);
    let z = identity(3);

    // ==========================================
    // STEP 1: Build the allow-list and initialize
    // ==========================================
    let tree = MerkleTree::from_identities(&[x, y]).unwrap();
    let mut registry = Registry::new(CollectionInfo::default());
    registry.initialize(authority, tree.root()).unwrap();

    // ==========================================
    // STEP 2: X mints with a valid proof
    // ==========================================
    let x_proof = tree.proof_for(&x).unwrap();
    let id = registry.mint_by_proof(x, &x_proof, "ipfs://x").unwrap();
    assert_eq!(id, TokenId(1));
    assert_eq!(registry.owner_of(id).unwrap(), x);
    assert_eq!(registry.balance_of(&x).unwrap(), 1);

    // ==========================================
    // STEP 3: X cannot mint twice
    // ==========================================
    let err = registry
        .mint_by_proof(x, &x_proof, "ipfs://x2")
        .unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyMinted(_)));
    assert_eq!(err.category(), ErrorCategory::PreconditionViolation);

    // ==========================================
    // STEP 4: Y cannot use X's proof
    // ==========================================
    let err = registry
        .mint_by_proof(y, &x_proof, "ipfs://y")
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidProof(_)));
    assert_eq!(err.category(), ErrorCategory::VerificationFailure);
    assert!(!registry.has_minted(&y));

    // ==========================================
    // STEP 5: Authority issues to an outsider
    // ==========================================
    let id = registry.admin_mint(authority, z, "uri").unwrap();
    assert_eq!(id, TokenId(2));
    assert_eq!(registry.owner_of(id).unwrap(), z);
    assert!(!registry.has_minted(&z));

    // Y can still mint with its own proof
    let y_proof = tree.proof_for(&y).unwrap();
    assert_eq!(
        registry.mint_by_proof(y, &y_proof, "ipfs://y").unwrap(),
        TokenId(3)
    );
}

#[test]
fn test_nothing_works_before_initialize() {
    let mut registry = Registry::default();
    let caller = identity(1);

    for err in [
        registry.mint_by_proof(caller, &[], "uri").unwrap_err(),
        registry.update_root(caller, Hash256::new([1; 32])).unwrap_err(),
        registry.transfer_authority(caller, identity(2)).unwrap_err(),
    ] {
        assert!(matches!(err, RegistryError::NotInitialized));
    }
    assert!(!registry.is_initialized());
    assert!(registry.events().is_empty());
}

#[test]
fn test_delegated_transfer_lifecycle() {
    let authority = identity(0xad);
    let owner = identity(1);
    let delegate = identity(2);
    let buyer = identity(3);
    let operator = identity(4);

    let tree = MerkleTree::from_identities(&[owner]).unwrap();
    let mut registry = Registry::default();
    registry.initialize(authority, tree.root()).unwrap();

    // Single-member tree: the proof is empty and the root is the leaf
    let proof = tree.proof_for(&owner).unwrap();
    assert!(proof.is_empty());
    let id = registry.mint_by_proof(owner, &proof, "ipfs://o").unwrap();

    // Approve, then the delegate moves the token once
    registry.approve(owner, delegate, id).unwrap();
    registry.transfer(delegate, owner, buyer, id).unwrap();
    assert_eq!(registry.owner_of(id).unwrap(), buyer);
    assert!(registry.transfer(delegate, buyer, delegate, id).is_err());

    // Operator of the previous owner has no say over the buyer's token
    registry.set_operator_approval(owner, operator, true).unwrap();
    let err = registry
        .transfer(operator, owner, operator, id)
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotApprovedOrOwner { .. }));

    // Operator of the buyer does
    registry.set_operator_approval(buyer, operator, true).unwrap();
    registry.transfer(operator, buyer, owner, id).unwrap();
    assert_eq!(registry.owner_of(id).unwrap(), owner);

    assert_eq!(registry.balance_of(&owner).unwrap(), 1);
    assert_eq!(registry.balance_of(&buyer).unwrap(), 0);
    assert_eq!(registry.token_metadata(id).unwrap(), "ipfs://o");
}

#[test]
fn test_event_log_order() {
    let authority = identity(0xad);
    let x = identity(1);
    let tree = MerkleTree::from_identities(&[x, identity(2)]).unwrap();

    let mut registry = Registry::default();
    registry.initialize(authority, tree.root()).unwrap();
    let id = registry
        .mint_by_proof(x, &tree.proof_for(&x).unwrap(), "uri")
        .unwrap();

    // Failed calls emit nothing
    let _ = registry.mint_by_proof(x, &[], "uri");
    let _ = registry.update_root(x, Hash256::ZERO);

    registry.approve(x, identity(9), id).unwrap();
    registry.update_root(authority, Hash256::ZERO).unwrap();

    let names: Vec<&str> = registry.events().iter().map(|e| e.name()).collect();
    assert_eq!(
        names,
        vec![
            "initialized",
            "ownership_changed",
            "approval_granted",
            "root_changed"
        ]
    );
    assert_eq!(
        registry.events()[1],
        RegistryEvent::OwnershipChanged {
            from: None,
            to: x,
            token_id: id
        }
    );
}

#[test]
fn test_root_rotation() {
    let authority = identity(0xad);
    let early = identity(1);
    let late = identity(2);

    let first = MerkleTree::from_identities(&[early]).unwrap();
    let second = MerkleTree::from_identities(&[early, late]).unwrap();

    let mut registry = Registry::default();
    registry.initialize(authority, first.root()).unwrap();

    let late_proof = second.proof_for(&late).unwrap();
    assert!(!registry.is_member(&late, &late_proof));

    registry.update_root(authority, second.root()).unwrap();
    assert!(registry.is_member(&late, &late_proof));
    registry.mint_by_proof(late, &late_proof, "uri").unwrap();

    // Proofs against the old root no longer verify
    let early_old = first.proof_for(&early).unwrap();
    assert!(registry.mint_by_proof(early, &early_old, "uri").is_err());
    let early_new = second.proof_for(&early).unwrap();
    assert!(registry.mint_by_proof(early, &early_new, "uri").is_ok());
}

#[test]
fn test_persisted_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let authority = identity(0xad);

    // ==========================================
    // STEP 1: Operator prepares the allow-list file
    // ==========================================
    let members: Vec<Address> = (1..=7).map(identity).collect();
    let text: String = members.iter().map(|m| format!("{}\n", m)).collect();
    let parsed = parse_allow_list(&text).unwrap();
    assert_eq!(parsed, members);

    let bundle = ProofBundle::build(&parsed).unwrap();
    for member in &members {
        let proof = bundle.proof_for(member).unwrap();
        assert!(verify(&leaf_hash(member), proof, &bundle.root));
    }

    // ==========================================
    // STEP 2: Each call loads, applies, saves
    // ==========================================
    let storage = RegistryStorage::new(dir.path().to_path_buf()).unwrap();
    let collection = CollectionInfo {
        name: "Founders".into(),
        symbol: "FND".into(),
    };

    let mut registry = storage.load_registry(&collection).unwrap();
    registry.initialize(authority, bundle.root).unwrap();
    storage.save_registry(&registry).unwrap();

    for member in &members[..3] {
        let mut registry = storage.load_registry(&collection).unwrap();
        let proof = bundle.proof_for(member).unwrap();
        registry
            .mint_by_proof(*member, proof, format!("ipfs://{}", member.short()))
            .unwrap();
        storage.save_registry(&registry).unwrap();
    }

    // A rejected call is never saved
    let mut registry = storage.load_registry(&collection).unwrap();
    assert!(registry
        .mint_by_proof(members[0], bundle.proof_for(&members[0]).unwrap(), "dup")
        .is_err());

    let reloaded = storage.load_registry(&collection).unwrap();
    assert_eq!(reloaded, registry);
    assert_eq!(reloaded.total_supply(), 3);
    assert_eq!(reloaded.collection().symbol, "FND");
    for (i, member) in members[..3].iter().enumerate() {
        let id = TokenId(i as u64 + 1);
        assert_eq!(reloaded.owner_of(id).unwrap(), *member);
        assert!(reloaded.has_minted(member));
    }
}
