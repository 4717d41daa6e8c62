//! # Registry Service - Helper Methods
//!
//! Private helpers: record I/O, the single commit path and the shared
//! authorization gates.

use super::*;
use crate::domain::entities::{ExecutionContext, KeyRecord};
use crate::domain::errors::short_hex;
use crate::domain::value_objects::{KeyPrefix, UNSET_PRINCIPAL};
use crate::events::RegistryEvent;
use crate::ports::outbound::BatchOperation;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

impl<KV, SR, PQ, EV> PqRegistryService<KV, SR, PQ, EV>
where
    KV: KeyValueStore,
    SR: RecordSerializer,
    PQ: PqCryptoProvider,
    EV: EventSink,
{
    /// Load the persisted administrator and counters, or write the initial
    /// ones on an empty store. An empty store needs a configured
    /// administrator.
    pub(crate) fn restore_or_bootstrap(&mut self) -> Result<(), RegistryError> {
        let admin_key = KeyPrefix::administrator_key();

        match self.load::<Principal>(&admin_key)? {
            Some(persisted) => {
                if persisted == UNSET_PRINCIPAL {
                    return Err(RegistryError::Configuration {
                        message: "stored administrator is the zero principal",
                    });
                }
                if self.config.has_administrator() && persisted != self.config.administrator {
                    warn!(
                        "[qc-18] Configured administrator {} ignored, store is owned by {}",
                        short_hex(&self.config.administrator),
                        short_hex(&persisted)
                    );
                }
                self.config.administrator = persisted;
                match self.load::<GlobalState>(&KeyPrefix::global_state_key())? {
                    Some(state) => self.state = state,
                    None => {
                        let op = self.insert_op(KeyPrefix::global_state_key(), &self.state)?;
                        self.kv_store.atomic_batch_write(vec![op])?;
                    }
                }
                info!(
                    "[qc-18] 💾 Restored registry: {} keys, threat level {}, freshness counter {}",
                    self.state.total_keys, self.state.threat_level, self.state.freshness_counter
                );
            }
            None => {
                if !self.config.has_administrator() {
                    warn!("[qc-18] ⛔ refusing to initialize a registry without an administrator");
                    return Err(RegistryError::Configuration {
                        message: "administrator is not set",
                    });
                }
                let ops = vec![
                    self.insert_op(admin_key, &self.config.administrator)?,
                    self.insert_op(KeyPrefix::global_state_key(), &self.state)?,
                ];
                self.kv_store.atomic_batch_write(ops)?;
                info!(
                    "[qc-18] 🆕 Initialized registry with administrator {}",
                    short_hex(&self.config.administrator)
                );
            }
        }
        Ok(())
    }

    /// Read and decode a record. Absent keys are `None`.
    pub(crate) fn load<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>, RegistryError> {
        match self.kv_store.get(key)? {
            Some(bytes) => Ok(Some(self.serializer.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn contains(&self, key: &[u8]) -> Result<bool, RegistryError> {
        Ok(self.kv_store.exists(key)?)
    }

    /// Encode a record that must not be stored yet.
    pub(crate) fn insert_op<T: Serialize>(
        &self,
        key: Vec<u8>,
        record: &T,
    ) -> Result<BatchOperation, RegistryError> {
        let value = self.serializer.serialize(record)?;
        Ok(BatchOperation::insert(key, value))
    }

    /// Encode a replacement for a stored record.
    pub(crate) fn update_op<T: Serialize>(
        &self,
        key: Vec<u8>,
        record: &T,
    ) -> Result<BatchOperation, RegistryError> {
        let value = self.serializer.serialize(record)?;
        Ok(BatchOperation::update(key, value))
    }

    /// Write `ops` as one atomic batch, then publish `event`.
    ///
    /// When `next_state` is given it is written in the same batch and only
    /// becomes the in-memory state once the batch is accepted.
    pub(crate) fn commit(
        &mut self,
        mut ops: Vec<BatchOperation>,
        next_state: Option<GlobalState>,
        event: RegistryEvent,
    ) -> Result<(), RegistryError> {
        if let Some(state) = &next_state {
            ops.push(self.update_op(KeyPrefix::global_state_key(), state)?);
        }

        self.kv_store.atomic_batch_write(ops)?;

        if let Some(state) = next_state {
            self.state = state;
        }
        if self.config.emit_events {
            self.events.publish(event);
        }
        Ok(())
    }

    /// Fail with `Unauthorized` unless the caller is the administrator.
    pub(crate) fn require_administrator(
        &self,
        ctx: &ExecutionContext,
        action: &'static str,
    ) -> Result<(), RegistryError> {
        if ctx.caller != self.config.administrator {
            warn!(
                "[qc-18] ⛔ {} rejected: caller {} is not the administrator",
                action,
                short_hex(&ctx.caller)
            );
            return Err(RegistryError::Unauthorized {
                reason: "caller is not the administrator",
            });
        }
        Ok(())
    }

    /// The caller's key record, which must exist and be active.
    pub(crate) fn require_active_keys(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<KeyRecord, RegistryError> {
        let record = self
            .load::<KeyRecord>(&KeyPrefix::keys_key(&ctx.caller))?
            .ok_or_else(|| {
                debug!("[qc-18] no key record for {}", short_hex(&ctx.caller));
                RegistryError::NotFound {
                    entity: "key record",
                }
            })?;

        if !record.is_active {
            warn!(
                "[qc-18] ⛔ keys of {} are deactivated",
                short_hex(&ctx.caller)
            );
            return Err(RegistryError::Unauthorized {
                reason: "key material is inactive",
            });
        }
        Ok(record)
    }
}
