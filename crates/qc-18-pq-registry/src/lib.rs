//! # QC-18 Post-Quantum Registry
//!
//! **Subsystem ID:** 18
//!
//! ## Purpose
//!
//! A permissioned registry where principals register post-quantum key
//! material, attach verified signatures to message hashes and store
//! references to encrypted payloads. An administrator publishes Merkle
//! roots and controls a global threat level; anyone may build append-only
//! hash chains.
//!
//! The Dilithium, SPHINCS+ and Kyber schemes are simulated with size and
//! format checks plus a chained SHA-256 construction. Production use needs
//! a real backend behind the `PqCryptoProvider` port.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | One key record per principal | `service/registry.rs` - `register_keys()` |
//! | Deactivation is one-way | `service/registry.rs` - `deactivate_keys()` |
//! | Signatures/encrypted data need active keys | `service/helpers.rs` - `require_active_keys()` |
//! | Merkle roots and threat level are admin-only | `service/helpers.rs` - `require_administrator()` |
//! | Chain link N references link N-1 | `service/registry.rs` - `extend_hash_chain()` |
//! | Threat level never exceeds 10 | `service/registry.rs` - `update_threat_level()` |
//! | Failures leave no partial writes | `service/helpers.rs` - `commit()` |
//! | New records never overwrite stored ones | `adapters/storage/mod.rs` - `apply_checked()` |
//! | An administrator is always configured | `service/helpers.rs` - `restore_or_bootstrap()` |
//!
//! ## Outbound Dependencies
//!
//! | Port | Adapter | Purpose |
//! |------|---------|---------|
//! | `KeyValueStore` | `InMemoryKVStore`, `FileBackedKVStore` | Table persistence |
//! | `RecordSerializer` | `BincodeRecordSerializer` | Record encoding |
//! | `PqCryptoProvider` | `SimulatedPqCrypto` | Key checks, signature check |
//! | `EventSink` | `InMemoryEventSink`, `TracingEventSink` | Committed-mutation events |
//!
//! ## Usage Example
//!
//! ```
//! use qc_18_pq_registry::prelude::*;
//!
//! let admin = [0xAD; 32];
//! let mut registry = InMemoryPqRegistry::in_memory(RegistryConfig::new(admin)).unwrap();
//!
//! let ctx = ExecutionContext::new([0x01; 32], BlockContext::new(1, 1_700_000_000, [0x42; 32]));
//! let head = registry.initialize_hash_chain(&ctx, [0xC0; 32], [0x00; 32]).unwrap();
//! let next = registry.extend_hash_chain(&ctx, [0xC0; 32], b"entry").unwrap();
//!
//! assert_eq!(next, post_quantum_hash_concat(&[&head[..], &b"entry"[..]]));
//! assert!(registry.verify_hash_chain(&[0xC0; 32]).unwrap());
//! ```

// Crate-level lints
#![warn(clippy::all)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        BlockContext, EncryptedRecord, ExecutionContext, GlobalState, HashChainLink, KeyRecord,
        MerkleRootRecord, RegistryStats, SignatureRecord,
    };

    // Value objects
    pub use crate::domain::value_objects::{
        Hash, Height, KeyPrefix, Principal, RegistryConfig, Timestamp, MAX_THREAT_LEVEL,
    };

    // Hashing and validators
    pub use crate::domain::hashing::{
        generate_freshness_nonce, post_quantum_hash, post_quantum_hash_concat,
    };
    pub use crate::domain::validators;

    // Errors
    pub use crate::domain::errors::{ErrorKind, KVStoreError, RegistryError, SerializationError};

    // Ports
    pub use crate::ports::inbound::PqRegistryApi;
    pub use crate::ports::outbound::{
        BatchOperation, EventSink, KeyValueStore, PqCryptoProvider, RecordSerializer,
        SimulatedPqCrypto,
    };

    // Events
    pub use crate::events::{topics, RegistryEvent};

    // Adapters
    pub use crate::adapters::{
        BincodeRecordSerializer, FileBackedKVStore, InMemoryEventSink, InMemoryKVStore,
        TracingEventSink,
    };

    // Service
    pub use crate::service::{
        BatchEntry, CommandOutcome, InMemoryPqRegistry, PqRegistryService, RegistryCommand,
        RegistryDependencies,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 18;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Post-Quantum Registry";

// =============================================================================
// TESTS
// =============================================================================
