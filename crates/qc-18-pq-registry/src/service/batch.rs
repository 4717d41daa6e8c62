//! # Batch Application
//!
//! Commands applied in caller order within one block. Each entry commits
//! on its own: a failing entry leaves no writes behind and does not stop
//! the entries after it.
//!
//! Byte fields are hex strings in JSON so a batch file stays readable.

use super::*;
use crate::domain::entities::{BlockContext, ExecutionContext};
use crate::domain::value_objects::Hash;
use crate::ports::inbound::PqRegistryApi;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One registry mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RegistryCommand {
    RegisterKeys {
        #[serde(with = "hex::serde")]
        dilithium_key: Vec<u8>,
        #[serde(with = "hex::serde")]
        sphincs_key: Vec<u8>,
        #[serde(with = "hex::serde")]
        kyber_key: Vec<u8>,
    },
    CreateSignature {
        #[serde(with = "hex::serde")]
        message_hash: Hash,
        #[serde(with = "hex::serde")]
        dilithium_sig: Vec<u8>,
        #[serde(with = "hex::serde")]
        sphincs_sig: Vec<u8>,
    },
    StoreEncryptedData {
        #[serde(with = "hex::serde")]
        data_id: Hash,
        #[serde(with = "hex::serde")]
        ciphertext: Vec<u8>,
        #[serde(with = "hex::serde")]
        metadata_hash: Hash,
    },
    CreateMerkleRoot {
        root_id: u64,
        #[serde(with = "hex::serde")]
        root_hash: Hash,
        tree_height: u64,
        leaf_count: u64,
    },
    InitializeHashChain {
        #[serde(with = "hex::serde")]
        chain_id: Hash,
        #[serde(with = "hex::serde")]
        initial_hash: Hash,
    },
    ExtendHashChain {
        #[serde(with = "hex::serde")]
        chain_id: Hash,
        #[serde(with = "hex::serde")]
        new_data: Vec<u8>,
    },
    UpdateThreatLevel {
        level: u32,
    },
    DeactivateKeys,
}

impl RegistryCommand {
    /// Operation name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            RegistryCommand::RegisterKeys { .. } => "register_keys",
            RegistryCommand::CreateSignature { .. } => "create_signature",
            RegistryCommand::StoreEncryptedData { .. } => "store_encrypted_data",
            RegistryCommand::CreateMerkleRoot { .. } => "create_merkle_root",
            RegistryCommand::InitializeHashChain { .. } => "initialize_hash_chain",
            RegistryCommand::ExtendHashChain { .. } => "extend_hash_chain",
            RegistryCommand::UpdateThreatLevel { .. } => "update_threat_level",
            RegistryCommand::DeactivateKeys => "deactivate_keys",
        }
    }
}

/// A command and the principal submitting it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    #[serde(with = "hex::serde")]
    pub caller: Principal,
    pub command: RegistryCommand,
}

/// Success value of a command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// The command returns nothing beyond success.
    Done,
    /// Hash of the created chain link.
    ChainHash {
        #[serde(with = "hex::serde")]
        hash: Hash,
    },
    ThreatLevel {
        level: u32,
    },
}

impl<KV, SR, PQ, EV> PqRegistryService<KV, SR, PQ, EV>
where
    KV: KeyValueStore,
    SR: RecordSerializer,
    PQ: PqCryptoProvider,
    EV: EventSink,
{
    /// Run a single command in the given context.
    pub fn execute(
        &mut self,
        ctx: &ExecutionContext,
        command: &RegistryCommand,
    ) -> Result<CommandOutcome, RegistryError> {
        match command {
            RegistryCommand::RegisterKeys {
                dilithium_key,
                sphincs_key,
                kyber_key,
            } => self
                .register_keys(ctx, dilithium_key, sphincs_key, kyber_key)
                .map(|_| CommandOutcome::Done),
            RegistryCommand::CreateSignature {
                message_hash,
                dilithium_sig,
                sphincs_sig,
            } => self
                .create_signature(ctx, *message_hash, dilithium_sig, sphincs_sig)
                .map(|_| CommandOutcome::Done),
            RegistryCommand::StoreEncryptedData {
                data_id,
                ciphertext,
                metadata_hash,
            } => self
                .store_encrypted_data(ctx, *data_id, ciphertext, *metadata_hash)
                .map(|_| CommandOutcome::Done),
            RegistryCommand::CreateMerkleRoot {
                root_id,
                root_hash,
                tree_height,
                leaf_count,
            } => self
                .create_merkle_root(ctx, *root_id, *root_hash, *tree_height, *leaf_count)
                .map(|_| CommandOutcome::Done),
            RegistryCommand::InitializeHashChain {
                chain_id,
                initial_hash,
            } => self
                .initialize_hash_chain(ctx, *chain_id, *initial_hash)
                .map(|hash| CommandOutcome::ChainHash { hash }),
            RegistryCommand::ExtendHashChain { chain_id, new_data } => self
                .extend_hash_chain(ctx, *chain_id, new_data)
                .map(|hash| CommandOutcome::ChainHash { hash }),
            RegistryCommand::UpdateThreatLevel { level } => self
                .update_threat_level(ctx, *level)
                .map(|level| CommandOutcome::ThreatLevel { level }),
            RegistryCommand::DeactivateKeys => {
                self.deactivate_keys(ctx).map(|_| CommandOutcome::Done)
            }
        }
    }

    /// Apply `entries` in order at `block`, one result per entry.
    pub fn apply_batch(
        &mut self,
        block: &BlockContext,
        entries: Vec<BatchEntry>,
    ) -> Vec<Result<CommandOutcome, RegistryError>> {
        let total = entries.len();
        let results: Vec<_> = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let ctx = ExecutionContext::new(entry.caller, block.clone());
                let result = self.execute(&ctx, &entry.command);
                if let Err(e) = &result {
                    debug!(
                        "[qc-18] batch entry {} ({}) failed: {}",
                        index,
                        entry.command.name(),
                        e
                    );
                }
                result
            })
            .collect();

        let applied = results.iter().filter(|r| r.is_ok()).count();
        info!(
            "[qc-18] 📦 Applied batch at height {}: {}/{} entries committed",
            block.height, applied, total
        );
        results
    }
}
