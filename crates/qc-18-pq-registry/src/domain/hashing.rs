//! # Quantum Hash Primitive
//!
//! Four-round chained SHA-256 used for freshness nonces, hash-chain
//! extension and the simulated lattice signature check.
//!
//! ## Construction
//!
//! ```text
//! r0 = input
//! r1 = SHA256(r0)
//! r2 = SHA256(r1 || r0)
//! r3 = SHA256(r2 || r1)
//! r4 = SHA256(r3 || r2)   <- output
//! ```
//!
//! This is NOT a post-quantum primitive. Its only guaranteed properties are
//! determinism and the avalanche behaviour inherited from SHA-256.

use crate::domain::entities::{BlockContext, GlobalState};
use crate::domain::value_objects::{Hash, LATTICE_CHECK_PREFIX_LEN};
use sha2::{Digest, Sha256};

const HASH_ROUNDS: usize = 4;

/// One-shot SHA-256.
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// SHA-256 over the concatenation of `inputs`.
pub fn sha256_many(inputs: &[&[u8]]) -> Hash {
    let mut hasher = Sha256::new();
    for input in inputs {
        hasher.update(input);
    }
    hasher.finalize().into()
}

/// Chained multi-round hash.
pub fn post_quantum_hash(input: &[u8]) -> Hash {
    let mut prev = sha256(input);
    let mut current = sha256_many(&[&prev[..], input]);
    for _ in 2..HASH_ROUNDS {
        let next = sha256_many(&[&current[..], &prev[..]]);
        prev = current;
        current = next;
    }
    current
}

/// `post_quantum_hash` over the concatenation of `parts`.
pub fn post_quantum_hash_concat(parts: &[&[u8]]) -> Hash {
    post_quantum_hash(&parts.concat())
}

/// Simulated lattice signature check.
///
/// Accepts iff the first 16 bytes of `post_quantum_hash(pk || sig || hash)`
/// equal the first 16 bytes of `sha256(pk)`. A structural stand-in only.
pub fn verify_lattice_signature(public_key: &[u8], signature: &[u8], message_hash: &Hash) -> bool {
    let computed = post_quantum_hash_concat(&[public_key, signature, &message_hash[..]]);
    let reference = sha256(public_key);
    computed[..LATTICE_CHECK_PREFIX_LEN] == reference[..LATTICE_CHECK_PREFIX_LEN]
}

/// Derive a freshness nonce and advance the counter.
///
/// Input is `block_id || decimal(height) || be_u64(counter)`. Two calls in
/// the same block never collide because the counter is part of the input.
pub fn generate_freshness_nonce(block: &BlockContext, state: &mut GlobalState) -> Hash {
    let height_text = block.height.to_string();
    let counter = state.freshness_counter.to_be_bytes();
    let nonce = post_quantum_hash_concat(&[
        &block.block_id[..],
        height_text.as_bytes(),
        &counter[..],
    ]);
    state.freshness_counter += 1;
    nonce
}
