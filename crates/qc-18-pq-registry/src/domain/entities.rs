//! # Domain Entities
//!
//! Records held by the registry tables, the singleton global state and the
//! execution context every operation is evaluated against.
//!
//! ## Tables
//!
//! | Record | Key | Mutability |
//! |--------|-----|------------|
//! | `KeyRecord` | principal | only `is_active` (true → false) |
//! | `SignatureRecord` | (signer, message hash) | immutable |
//! | `EncryptedRecord` | (owner, data id) | immutable |
//! | `MerkleRootRecord` | root id | immutable |
//! | `HashChainLink` | (chain id, position) | immutable, append-only per chain |

use crate::domain::value_objects::{Hash, Height, Principal, Timestamp};
use serde::{Deserialize, Serialize};

// =============================================================================
// EXECUTION CONTEXT
// =============================================================================

/// Ledger context shared by every call within one block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    /// Current block height.
    pub height: Height,
    /// Block timestamp (unix seconds).
    pub timestamp: Timestamp,
    /// Identifying hash of the previous block, unique per height.
    pub block_id: Hash,
}

impl BlockContext {
    pub fn new(height: Height, timestamp: Timestamp, block_id: Hash) -> Self {
        Self {
            height,
            timestamp,
            block_id,
        }
    }
}

/// Execution context for a single registry call.
///
/// Supplied by the embedding system; the registry never reads ambient
/// globals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Authenticated caller.
    pub caller: Principal,
    /// Block context.
    pub block: BlockContext,
}

impl ExecutionContext {
    pub fn new(caller: Principal, block: BlockContext) -> Self {
        Self { caller, block }
    }

    /// Current height.
    #[inline]
    pub fn height(&self) -> Height {
        self.block.height
    }

    /// Current timestamp.
    #[inline]
    pub fn timestamp(&self) -> Timestamp {
        self.block.timestamp
    }
}

// =============================================================================
// TABLE RECORDS
// =============================================================================

/// Post-quantum key material registered by a principal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Dilithium-like public key (1312 bytes).
    pub dilithium_key: Vec<u8>,
    /// SPHINCS+-like public key (32 bytes).
    pub sphincs_key: Vec<u8>,
    /// Kyber-like public key (800 bytes).
    pub kyber_key: Vec<u8>,
    /// Height at which the keys were registered.
    pub registration_height: Height,
    /// Cleared by deactivation. Never set again.
    pub is_active: bool,
}

/// A verified signature over a message hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Dilithium-like signature (2420 bytes).
    pub dilithium_sig: Vec<u8>,
    /// SPHINCS+-like signature (17088 bytes).
    pub sphincs_sig: Vec<u8>,
    /// Block timestamp at creation.
    pub created_at: Timestamp,
    /// Block height at creation.
    pub height: Height,
    /// Set once verification passed.
    pub verified: bool,
}

/// Reference to an encrypted payload held off-registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedRecord {
    /// Kyber-like ciphertext (768 bytes).
    pub ciphertext: Vec<u8>,
    /// Hash of the payload metadata.
    pub metadata_hash: Hash,
    /// Height at which the reference was stored.
    pub encryption_height: Height,
    pub access_count: u64,
}

/// Administrator-published Merkle root.
///
/// The tree itself is never computed by the registry; the root is stored
/// opaquely together with its shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleRootRecord {
    pub root_hash: Hash,
    /// Always > 0.
    pub tree_height: u64,
    /// Always > 0.
    pub leaf_count: u64,
    pub creation_height: Height,
    pub quantum_safe: bool,
}

/// One link of an append-only hash chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashChainLink {
    /// Hash of this link.
    pub hash_value: Hash,
    /// `hash_value` of the previous link, or the initial hash at position 0.
    pub previous_hash: Hash,
    /// Chain length once this link was appended (position + 1).
    pub chain_length: u64,
    pub verification_count: u64,
}

// =============================================================================
// GLOBAL STATE
// =============================================================================

/// Process-wide counters.
///
/// Created at initialization and mutated only by registry operations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalState {
    /// Administrator-controlled threat level (0..=10).
    pub threat_level: u32,
    /// Number of key records ever registered.
    pub total_keys: u64,
    /// Incremented by every freshness nonce.
    pub freshness_counter: u64,
}

/// Snapshot returned by `get_contract_stats`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub total_keys: u64,
    pub threat_level: u32,
}

impl From<&GlobalState> for RegistryStats {
    fn from(state: &GlobalState) -> Self {
        Self {
            total_keys: state.total_keys,
            threat_level: state.threat_level,
        }
    }
}
