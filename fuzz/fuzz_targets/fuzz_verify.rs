#![no_main]

use libfuzzer_sys::fuzz_target;
use proofmint_core::{hash_pair, process_proof, verify, Address, Hash256, MerkleTree};

fuzz_target!(|data: &[u8]| {
    // Interpret input as leaf || root || siblings..., 32 bytes each
    let chunks: Vec<Hash256> = data
        .chunks_exact(32)
        .map(|c| {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(c);
            Hash256::new(bytes)
        })
        .collect();

    if chunks.len() >= 2 {
        let (leaf, root, proof) = (chunks[0], chunks[1], &chunks[2..]);

        // Deterministic and consistent with the recomputed root
        let ok = verify(&leaf, proof, &root);
        assert_eq!(ok, verify(&leaf, proof, &root));
        assert_eq!(ok, process_proof(&leaf, proof) == root);

        if let Some(sibling) = proof.first() {
            assert_eq!(hash_pair(&leaf, sibling), hash_pair(sibling, &leaf));
        }
    }

    // Any tree built from the input must accept its own members
    let members: Vec<Address> = data
        .chunks_exact(20)
        .take(64)
        .map(|c| {
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(c);
            Address::new(bytes)
        })
        .collect();

    if let Ok(tree) = MerkleTree::from_identities(&members) {
        for member in &members {
            let proof = tree.proof_for(member).unwrap();
            assert!(verify(&proofmint_core::leaf_hash(member), &proof, &tree.root()));
        }
    }
});
