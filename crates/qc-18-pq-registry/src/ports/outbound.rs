//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the registry requires the host application to provide.
//!
//! | Port | Default adapter | Purpose |
//! |------|-----------------|---------|
//! | `KeyValueStore` | `InMemoryKVStore`, `FileBackedKVStore` | Table persistence |
//! | `RecordSerializer` | `BincodeRecordSerializer` | Record encoding |
//! | `PqCryptoProvider` | `SimulatedPqCrypto` | Key validation and signature check |
//! | `EventSink` | `InMemoryEventSink`, `TracingEventSink` | Committed-mutation events |

use crate::domain::errors::{KVStoreError, SerializationError};
use crate::domain::hashing;
use crate::domain::validators;
use crate::domain::value_objects::Hash;
use crate::events::RegistryEvent;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Abstract interface for key-value database operations.
///
/// Every registry mutation is committed through a single
/// `atomic_batch_write` call. Records are never deleted.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch are applied, or NONE are. An
    /// `Insert` of a present key or an `Update` of an absent key rejects
    /// the whole batch. Operations see the effect of earlier operations in
    /// the same batch.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Write a key that must not exist yet.
    Insert { key: Vec<u8>, value: Vec<u8> },
    /// Overwrite a key that must already exist.
    Update { key: Vec<u8>, value: Vec<u8> },
}

impl BatchOperation {
    /// Create an Insert operation.
    pub fn insert(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Insert {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create an Update operation.
    pub fn update(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Update {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The key this operation writes.
    pub fn key(&self) -> &[u8] {
        match self {
            BatchOperation::Insert { key, .. } | BatchOperation::Update { key, .. } => key,
        }
    }
}

/// Abstract interface for record encoding.
pub trait RecordSerializer: Send + Sync {
    /// Serialize a record to bytes.
    fn serialize<T: Serialize>(&self, record: &T) -> Result<Vec<u8>, SerializationError>;

    /// Deserialize bytes to a record.
    fn deserialize<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, SerializationError>;
}

/// Post-quantum scheme capability.
///
/// The registry only ever talks to key material through this port, so a
/// real Dilithium/SPHINCS+/Kyber backend can replace the structural
/// simulation without touching the state machine.
pub trait PqCryptoProvider: Send + Sync {
    fn validate_dilithium_key(&self, key: &[u8]) -> bool;

    fn validate_sphincs_key(&self, key: &[u8]) -> bool;

    fn validate_kyber_key(&self, key: &[u8]) -> bool;

    fn validate_kyber_ciphertext(&self, ciphertext: &[u8]) -> bool;

    /// Check the fixed signature sizes.
    fn validate_signature_sizes(&self, dilithium_sig: &[u8], sphincs_sig: &[u8]) -> bool {
        validators::validate_signature_sizes(dilithium_sig, sphincs_sig)
    }

    /// Verify a Dilithium signature over a message hash.
    fn verify_lattice_signature(
        &self,
        public_key: &[u8],
        signature: &[u8],
        message_hash: &Hash,
    ) -> bool;
}

/// Structural simulation of the three schemes.
///
/// Size/format checks and the chained-hash lattice stand-in. Not a
/// cryptographic implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedPqCrypto;

impl PqCryptoProvider for SimulatedPqCrypto {
    fn validate_dilithium_key(&self, key: &[u8]) -> bool {
        validators::validate_dilithium_key(key)
    }

    fn validate_sphincs_key(&self, key: &[u8]) -> bool {
        validators::validate_sphincs_key(key)
    }

    fn validate_kyber_key(&self, key: &[u8]) -> bool {
        validators::validate_kyber_key(key)
    }

    fn validate_kyber_ciphertext(&self, ciphertext: &[u8]) -> bool {
        validators::validate_kyber_ciphertext(ciphertext)
    }

    fn verify_lattice_signature(
        &self,
        public_key: &[u8],
        signature: &[u8],
        message_hash: &Hash,
    ) -> bool {
        hashing::verify_lattice_signature(public_key, signature, message_hash)
    }
}

/// Receiver of committed-mutation events.
pub trait EventSink: Send + Sync {
    /// Publish an event. Must not fail the already committed operation.
    fn publish(&self, event: RegistryEvent);
}
