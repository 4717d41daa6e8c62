//! # Value Objects
//!
//! Fixed size contracts, storage key layout and registry configuration.

use serde::{Deserialize, Serialize};

/// 32-byte digest used for message hashes, Merkle roots and chain links.
pub type Hash = [u8; 32];

/// Authenticated caller identity supplied by the execution context.
pub type Principal = [u8; 32];

/// Block height as reported by the embedding ledger.
pub type Height = u64;

/// Unix timestamp in seconds since epoch.
pub type Timestamp = u64;

// =============================================================================
// BYTE-SIZE CONTRACTS
// =============================================================================

/// Dilithium-like public key length.
pub const DILITHIUM_PUBLIC_KEY_SIZE: usize = 1312;
/// Dilithium-like signature length.
pub const DILITHIUM_SIGNATURE_SIZE: usize = 2420;
/// SPHINCS+-like public key length.
pub const SPHINCS_PUBLIC_KEY_SIZE: usize = 32;
/// SPHINCS+-like signature length.
pub const SPHINCS_SIGNATURE_SIZE: usize = 17088;
/// Kyber-like public key length.
pub const KYBER_PUBLIC_KEY_SIZE: usize = 800;
/// Kyber-like ciphertext length.
pub const KYBER_CIPHERTEXT_SIZE: usize = 768;

/// Highest threat level the administrator may set.
pub const MAX_THREAT_LEVEL: u32 = 10;

/// Number of leading digest bytes compared by the simulated lattice check.
pub const LATTICE_CHECK_PREFIX_LEN: usize = 16;

/// The all-zero principal. Never accepted as an administrator.
pub const UNSET_PRINCIPAL: Principal = [0u8; 32];

// =============================================================================
// STORAGE KEY LAYOUT
// =============================================================================

/// Key prefixes for the key-value store.
///
/// Every table lives under its own prefix so a single store can hold all
/// of them without collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    /// Key records: `k:{principal}` -> KeyRecord
    Keys,
    /// Signature records: `s:{signer}{message_hash}` -> SignatureRecord
    Signature,
    /// Encrypted payload references: `e:{owner}{data_id}` -> EncryptedRecord
    Encrypted,
    /// Merkle roots: `m:{root_id}` -> MerkleRootRecord
    MerkleRoot,
    /// Hash chain links: `c:{chain_id}{position}` -> HashChainLink
    ChainLink,
    /// Chain length index: `l:{chain_id}` -> u64
    ChainLength,
    /// Singletons: `g:state`, `g:admin`
    Global,
}

impl KeyPrefix {
    /// Get the byte prefix for this key type.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::Keys => b"k:",
            KeyPrefix::Signature => b"s:",
            KeyPrefix::Encrypted => b"e:",
            KeyPrefix::MerkleRoot => b"m:",
            KeyPrefix::ChainLink => b"c:",
            KeyPrefix::ChainLength => b"l:",
            KeyPrefix::Global => b"g:",
        }
    }

    /// Build a full key from the prefix and the given key components.
    pub fn key(&self, parts: &[&[u8]]) -> Vec<u8> {
        let len = parts.iter().map(|p| p.len()).sum::<usize>() + 2;
        let mut key = Vec::with_capacity(len);
        key.extend_from_slice(self.as_bytes());
        for part in parts {
            key.extend_from_slice(part);
        }
        key
    }

    pub fn keys_key(principal: &Principal) -> Vec<u8> {
        KeyPrefix::Keys.key(&[&principal[..]])
    }

    pub fn signature_key(signer: &Principal, message_hash: &Hash) -> Vec<u8> {
        KeyPrefix::Signature.key(&[&signer[..], &message_hash[..]])
    }

    pub fn encrypted_key(owner: &Principal, data_id: &Hash) -> Vec<u8> {
        KeyPrefix::Encrypted.key(&[&owner[..], &data_id[..]])
    }

    pub fn merkle_root_key(root_id: u64) -> Vec<u8> {
        KeyPrefix::MerkleRoot.key(&[&root_id.to_be_bytes()[..]])
    }

    /// Fixed-width position, so keys of different chains never overlap.
    pub fn chain_link_key(chain_id: &Hash, position: u64) -> Vec<u8> {
        KeyPrefix::ChainLink.key(&[&chain_id[..], &position.to_be_bytes()[..]])
    }

    pub fn chain_length_key(chain_id: &Hash) -> Vec<u8> {
        KeyPrefix::ChainLength.key(&[&chain_id[..]])
    }

    pub fn global_state_key() -> Vec<u8> {
        KeyPrefix::Global.key(&[&b"state"[..]])
    }

    pub fn administrator_key() -> Vec<u8> {
        KeyPrefix::Global.key(&[&b"admin"[..]])
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Configuration for the registry service.
///
/// The administrator supplied here is only used the first time a store is
/// opened; afterwards the persisted administrator wins. The default leaves
/// it unset, and an empty store refuses to start without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Principal allowed to create Merkle roots and set the threat level.
    pub administrator: Principal,
    /// Publish a `RegistryEvent` after every committed mutation.
    pub emit_events: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            administrator: UNSET_PRINCIPAL,
            emit_events: true,
        }
    }
}

impl RegistryConfig {
    /// Create a configuration for the given administrator.
    pub fn new(administrator: Principal) -> Self {
        Self {
            administrator,
            ..Self::default()
        }
    }

    /// Set the administrator principal.
    pub fn with_administrator(mut self, administrator: Principal) -> Self {
        self.administrator = administrator;
        self
    }

    /// Returns true once an administrator other than the all-zero
    /// principal is configured.
    pub fn has_administrator(&self) -> bool {
        self.administrator != UNSET_PRINCIPAL
    }

    /// Enable or disable event publication.
    pub fn with_events(mut self, emit: bool) -> Self {
        self.emit_events = emit;
        self
    }

    /// The threat level ceiling is fixed and not configurable.
    #[inline]
    pub const fn max_threat_level(&self) -> u32 {
        MAX_THREAT_LEVEL
    }
}
