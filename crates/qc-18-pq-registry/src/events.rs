//! # Registry Events
//!
//! Published through the `EventSink` port after a mutation has been
//! committed. A failed operation publishes nothing.

use crate::domain::value_objects::{Hash, Height, Principal};
use serde::{Deserialize, Serialize};

/// Event topics, one per mutating operation.
pub mod topics {
    pub const KEYS_REGISTERED: &str = "pq_registry.keys_registered";
    pub const KEYS_DEACTIVATED: &str = "pq_registry.keys_deactivated";
    pub const SIGNATURE_CREATED: &str = "pq_registry.signature_created";
    pub const ENCRYPTED_DATA_STORED: &str = "pq_registry.encrypted_data_stored";
    pub const MERKLE_ROOT_CREATED: &str = "pq_registry.merkle_root_created";
    pub const HASH_CHAIN_INITIALIZED: &str = "pq_registry.hash_chain_initialized";
    pub const HASH_CHAIN_EXTENDED: &str = "pq_registry.hash_chain_extended";
    pub const THREAT_LEVEL_UPDATED: &str = "pq_registry.threat_level_updated";
}

/// A committed registry mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    KeysRegistered {
        principal: Principal,
        height: Height,
    },
    KeysDeactivated {
        principal: Principal,
        height: Height,
    },
    SignatureCreated {
        signer: Principal,
        message_hash: Hash,
        height: Height,
    },
    EncryptedDataStored {
        owner: Principal,
        data_id: Hash,
        height: Height,
    },
    MerkleRootCreated {
        root_id: u64,
        root_hash: Hash,
        height: Height,
    },
    HashChainInitialized {
        chain_id: Hash,
        chain_hash: Hash,
        height: Height,
    },
    HashChainExtended {
        chain_id: Hash,
        position: u64,
        chain_hash: Hash,
        height: Height,
    },
    ThreatLevelUpdated {
        previous: u32,
        level: u32,
        height: Height,
    },
}

impl RegistryEvent {
    /// Topic this event is published under.
    pub fn topic(&self) -> &'static str {
        match self {
            RegistryEvent::KeysRegistered { .. } => topics::KEYS_REGISTERED,
            RegistryEvent::KeysDeactivated { .. } => topics::KEYS_DEACTIVATED,
            RegistryEvent::SignatureCreated { .. } => topics::SIGNATURE_CREATED,
            RegistryEvent::EncryptedDataStored { .. } => topics::ENCRYPTED_DATA_STORED,
            RegistryEvent::MerkleRootCreated { .. } => topics::MERKLE_ROOT_CREATED,
            RegistryEvent::HashChainInitialized { .. } => topics::HASH_CHAIN_INITIALIZED,
            RegistryEvent::HashChainExtended { .. } => topics::HASH_CHAIN_EXTENDED,
            RegistryEvent::ThreatLevelUpdated { .. } => topics::THREAT_LEVEL_UPDATED,
        }
    }

    /// Height at which the mutation was committed.
    pub fn height(&self) -> Height {
        match self {
            RegistryEvent::KeysRegistered { height, .. }
            | RegistryEvent::KeysDeactivated { height, .. }
            | RegistryEvent::SignatureCreated { height, .. }
            | RegistryEvent::EncryptedDataStored { height, .. }
            | RegistryEvent::MerkleRootCreated { height, .. }
            | RegistryEvent::HashChainInitialized { height, .. }
            | RegistryEvent::HashChainExtended { height, .. }
            | RegistryEvent::ThreatLevelUpdated { height, .. } => *height,
        }
    }
}
