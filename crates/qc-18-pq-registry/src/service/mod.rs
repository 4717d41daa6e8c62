//! # Post-Quantum Registry Service
//!
//! The registry state machine.
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements `PqRegistryApi` for mutations and queries
//! 2. Applies JSON-decodable command batches in caller order
//! 3. Commits every mutation as exactly one atomic store batch
//! 4. Uses dependency injection for storage, encoding, crypto and events
//!
//! `GlobalState` is held in memory and persisted with every mutation that
//! changes it. The in-memory copy is only replaced after the store accepts
//! the batch, so a failed commit leaves both views untouched.

mod batch;
mod helpers;
mod registry;

pub use batch::{BatchEntry, CommandOutcome, RegistryCommand};

use crate::adapters::{BincodeRecordSerializer, InMemoryEventSink, InMemoryKVStore};
use crate::domain::entities::GlobalState;
use crate::domain::errors::RegistryError;
use crate::domain::value_objects::{Principal, RegistryConfig};
use crate::ports::outbound::{
    EventSink, KeyValueStore, PqCryptoProvider, RecordSerializer, SimulatedPqCrypto,
};

/// The registry service.
pub struct PqRegistryService<KV, SR, PQ, EV>
where
    KV: KeyValueStore,
    SR: RecordSerializer,
    PQ: PqCryptoProvider,
    EV: EventSink,
{
    /// Key-value store holding every table.
    pub(crate) kv_store: KV,
    /// Record encoder.
    pub(crate) serializer: SR,
    /// Key validation and signature verification.
    pub(crate) crypto: PQ,
    /// Receiver of committed-mutation events.
    pub(crate) events: EV,
    /// Effective configuration. The administrator is the persisted one.
    pub(crate) config: RegistryConfig,
    /// Counters, mirrored from `g:state`.
    pub(crate) state: GlobalState,
}

/// Dependencies for PqRegistryService
pub struct RegistryDependencies<KV, SR, PQ, EV> {
    pub kv_store: KV,
    pub serializer: SR,
    pub crypto: PQ,
    pub events: EV,
}

/// Registry wired to the in-memory adapters and simulated crypto.
pub type InMemoryPqRegistry =
    PqRegistryService<InMemoryKVStore, BincodeRecordSerializer, SimulatedPqCrypto, InMemoryEventSink>;

impl<KV, SR, PQ, EV> PqRegistryService<KV, SR, PQ, EV>
where
    KV: KeyValueStore,
    SR: RecordSerializer,
    PQ: PqCryptoProvider,
    EV: EventSink,
{
    /// Create the service over the given dependencies.
    ///
    /// On construction, this will:
    /// 1. Restore the administrator and `GlobalState` if the store has them
    /// 2. Otherwise persist the configured administrator and a zeroed state
    ///
    /// Fails with `Configuration` when an empty store is opened without an
    /// administrator.
    pub fn new(
        deps: RegistryDependencies<KV, SR, PQ, EV>,
        config: RegistryConfig,
    ) -> Result<Self, RegistryError> {
        let mut service = Self {
            kv_store: deps.kv_store,
            serializer: deps.serializer,
            crypto: deps.crypto,
            events: deps.events,
            config,
            state: GlobalState::default(),
        };
        service.restore_or_bootstrap()?;
        Ok(service)
    }

    /// The administrator principal in effect.
    pub fn administrator(&self) -> &Principal {
        &self.config.administrator
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Current counters.
    pub fn global_state(&self) -> &GlobalState {
        &self.state
    }

    pub fn event_sink(&self) -> &EV {
        &self.events
    }

    pub fn kv_store(&self) -> &KV {
        &self.kv_store
    }

    /// Consume the service and hand back the store.
    pub fn into_store(self) -> KV {
        self.kv_store
    }
}

impl InMemoryPqRegistry {
    /// Fresh registry on an empty in-memory store.
    pub fn in_memory(config: RegistryConfig) -> Result<Self, RegistryError> {
        Self::new(
            RegistryDependencies {
                kv_store: InMemoryKVStore::new(),
                serializer: BincodeRecordSerializer,
                crypto: SimulatedPqCrypto,
                events: InMemoryEventSink::new(),
            },
            config,
        )
    }
}
