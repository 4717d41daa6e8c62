//! # Registry API Implementation
//!
//! Implements the PqRegistryApi trait. Every mutation validates first and
//! then calls `commit` exactly once.

use super::*;
use crate::domain::entities::{
    EncryptedRecord, ExecutionContext, HashChainLink, KeyRecord, MerkleRootRecord, RegistryStats,
    SignatureRecord,
};
use crate::domain::errors::{short_hash, short_hex};
use crate::domain::hashing::{generate_freshness_nonce, post_quantum_hash_concat};
use crate::domain::value_objects::{Hash, KeyPrefix};
use crate::events::RegistryEvent;
use crate::ports::inbound::PqRegistryApi;
use tracing::{debug, info};

impl<KV, SR, PQ, EV> PqRegistryApi for PqRegistryService<KV, SR, PQ, EV>
where
    KV: KeyValueStore,
    SR: RecordSerializer,
    PQ: PqCryptoProvider,
    EV: EventSink,
{
    fn register_keys(
        &mut self,
        ctx: &ExecutionContext,
        dilithium_key: &[u8],
        sphincs_key: &[u8],
        kyber_key: &[u8],
    ) -> Result<(), RegistryError> {
        let invalid = if !self.crypto.validate_dilithium_key(dilithium_key) {
            Some("dilithium public key")
        } else if !self.crypto.validate_sphincs_key(sphincs_key) {
            Some("sphincs public key")
        } else if !self.crypto.validate_kyber_key(kyber_key) {
            Some("kyber public key")
        } else {
            None
        };
        if let Some(material) = invalid {
            debug!(
                "[qc-18] rejected {} from {}",
                material,
                short_hex(&ctx.caller)
            );
            return Err(RegistryError::InvalidKeyMaterial { material });
        }

        let key = KeyPrefix::keys_key(&ctx.caller);
        if self.contains(&key)? {
            return Err(RegistryError::AlreadyExists {
                entity: "key record",
            });
        }

        let record = KeyRecord {
            dilithium_key: dilithium_key.to_vec(),
            sphincs_key: sphincs_key.to_vec(),
            kyber_key: kyber_key.to_vec(),
            registration_height: ctx.height(),
            is_active: true,
        };

        let mut next = self.state.clone();
        next.total_keys += 1;

        let ops = vec![self.insert_op(key, &record)?];
        self.commit(
            ops,
            Some(next),
            RegistryEvent::KeysRegistered {
                principal: ctx.caller,
                height: ctx.height(),
            },
        )?;

        info!(
            "[qc-18] 🔑 Registered keys for {} at height {} ({} total)",
            short_hex(&ctx.caller),
            ctx.height(),
            self.state.total_keys
        );
        Ok(())
    }

    fn create_signature(
        &mut self,
        ctx: &ExecutionContext,
        message_hash: Hash,
        dilithium_sig: &[u8],
        sphincs_sig: &[u8],
    ) -> Result<(), RegistryError> {
        let keys = self.require_active_keys(ctx)?;

        let key = KeyPrefix::signature_key(&ctx.caller, &message_hash);
        if self.contains(&key)? {
            return Err(RegistryError::AlreadyExists {
                entity: "signature",
            });
        }

        if !self.crypto.validate_signature_sizes(dilithium_sig, sphincs_sig) {
            debug!(
                "[qc-18] signature sizes {}/{} rejected",
                dilithium_sig.len(),
                sphincs_sig.len()
            );
            return Err(RegistryError::InvalidSignature {
                reason: "unexpected signature size",
            });
        }

        if !self
            .crypto
            .verify_lattice_signature(&keys.dilithium_key, dilithium_sig, &message_hash)
        {
            debug!(
                "[qc-18] lattice check failed for {} over {}",
                short_hex(&ctx.caller),
                short_hash(&message_hash)
            );
            return Err(RegistryError::InvalidSignature {
                reason: "lattice verification failed",
            });
        }

        let record = SignatureRecord {
            dilithium_sig: dilithium_sig.to_vec(),
            sphincs_sig: sphincs_sig.to_vec(),
            created_at: ctx.timestamp(),
            height: ctx.height(),
            verified: true,
        };

        let ops = vec![self.insert_op(key, &record)?];
        self.commit(
            ops,
            None,
            RegistryEvent::SignatureCreated {
                signer: ctx.caller,
                message_hash,
                height: ctx.height(),
            },
        )?;

        info!(
            "[qc-18] ✍️ Signature by {} over {} recorded",
            short_hex(&ctx.caller),
            short_hash(&message_hash)
        );
        Ok(())
    }

    fn store_encrypted_data(
        &mut self,
        ctx: &ExecutionContext,
        data_id: Hash,
        ciphertext: &[u8],
        metadata_hash: Hash,
    ) -> Result<(), RegistryError> {
        self.require_active_keys(ctx)?;

        let key = KeyPrefix::encrypted_key(&ctx.caller, &data_id);
        if self.contains(&key)? {
            return Err(RegistryError::AlreadyExists {
                entity: "encrypted record",
            });
        }

        if !self.crypto.validate_kyber_ciphertext(ciphertext) {
            debug!("[qc-18] ciphertext of {} bytes rejected", ciphertext.len());
            return Err(RegistryError::InvalidKeyMaterial {
                material: "kyber ciphertext",
            });
        }

        let record = EncryptedRecord {
            ciphertext: ciphertext.to_vec(),
            metadata_hash,
            encryption_height: ctx.height(),
            access_count: 0,
        };

        let ops = vec![self.insert_op(key, &record)?];
        self.commit(
            ops,
            None,
            RegistryEvent::EncryptedDataStored {
                owner: ctx.caller,
                data_id,
                height: ctx.height(),
            },
        )?;

        info!(
            "[qc-18] 🔒 Encrypted data {} stored for {}",
            short_hash(&data_id),
            short_hex(&ctx.caller)
        );
        Ok(())
    }

    fn create_merkle_root(
        &mut self,
        ctx: &ExecutionContext,
        root_id: u64,
        root_hash: Hash,
        tree_height: u64,
        leaf_count: u64,
    ) -> Result<(), RegistryError> {
        self.require_administrator(ctx, "create_merkle_root")?;

        let key = KeyPrefix::merkle_root_key(root_id);
        if self.contains(&key)? {
            return Err(RegistryError::AlreadyExists {
                entity: "merkle root",
            });
        }

        if tree_height == 0 || leaf_count == 0 {
            debug!(
                "[qc-18] merkle root {} rejected: height={} leaves={}",
                root_id, tree_height, leaf_count
            );
            return Err(RegistryError::InvalidHash {
                tree_height,
                leaf_count,
            });
        }

        let record = MerkleRootRecord {
            root_hash,
            tree_height,
            leaf_count,
            creation_height: ctx.height(),
            quantum_safe: true,
        };

        let ops = vec![self.insert_op(key, &record)?];
        self.commit(
            ops,
            None,
            RegistryEvent::MerkleRootCreated {
                root_id,
                root_hash,
                height: ctx.height(),
            },
        )?;

        info!(
            "[qc-18] 🌳 Merkle root #{} = {} ({} leaves, height {})",
            root_id,
            short_hash(&root_hash),
            leaf_count,
            tree_height
        );
        Ok(())
    }

    fn initialize_hash_chain(
        &mut self,
        ctx: &ExecutionContext,
        chain_id: Hash,
        initial_hash: Hash,
    ) -> Result<Hash, RegistryError> {
        let head_key = KeyPrefix::chain_link_key(&chain_id, 0);
        if self.contains(&head_key)? {
            return Err(RegistryError::AlreadyExists {
                entity: "hash chain",
            });
        }

        // The nonce is drawn from a copy so a failed commit does not
        // advance the counter.
        let mut next = self.state.clone();
        let nonce = generate_freshness_nonce(&ctx.block, &mut next);
        let chain_hash = post_quantum_hash_concat(&[&initial_hash[..], &nonce[..]]);

        let link = HashChainLink {
            hash_value: chain_hash,
            previous_hash: initial_hash,
            chain_length: 1,
            verification_count: 0,
        };

        let ops = vec![
            self.insert_op(head_key, &link)?,
            self.insert_op(KeyPrefix::chain_length_key(&chain_id), &1u64)?,
        ];
        self.commit(
            ops,
            Some(next),
            RegistryEvent::HashChainInitialized {
                chain_id,
                chain_hash,
                height: ctx.height(),
            },
        )?;

        info!(
            "[qc-18] ⛓️ Hash chain {} initialized: {}",
            short_hash(&chain_id),
            short_hash(&chain_hash)
        );
        Ok(chain_hash)
    }

    fn extend_hash_chain(
        &mut self,
        ctx: &ExecutionContext,
        chain_id: Hash,
        new_data: &[u8],
    ) -> Result<Hash, RegistryError> {
        let length = self.get_hash_chain_length(&chain_id)?;
        let tail = match length.checked_sub(1) {
            Some(position) => self.get_hash_chain_info(&chain_id, position)?,
            None => None,
        };
        let tail = tail.ok_or_else(|| {
            debug!("[qc-18] no tail for chain {}", short_hash(&chain_id));
            RegistryError::NotFound {
                entity: "hash chain tail",
            }
        })?;

        let new_hash = post_quantum_hash_concat(&[&tail.hash_value[..], new_data]);
        let link = HashChainLink {
            hash_value: new_hash,
            previous_hash: tail.hash_value,
            chain_length: length + 1,
            verification_count: 0,
        };

        let ops = vec![
            self.insert_op(KeyPrefix::chain_link_key(&chain_id, length), &link)?,
            self.update_op(KeyPrefix::chain_length_key(&chain_id), &(length + 1))?,
        ];
        self.commit(
            ops,
            None,
            RegistryEvent::HashChainExtended {
                chain_id,
                position: length,
                chain_hash: new_hash,
                height: ctx.height(),
            },
        )?;

        info!(
            "[qc-18] ⛓️ Hash chain {} extended to {} links",
            short_hash(&chain_id),
            length + 1
        );
        Ok(new_hash)
    }

    fn update_threat_level(
        &mut self,
        ctx: &ExecutionContext,
        level: u32,
    ) -> Result<u32, RegistryError> {
        self.require_administrator(ctx, "update_threat_level")?;

        let max = self.config.max_threat_level();
        if level > max {
            debug!("[qc-18] threat level {} above {}", level, max);
            return Err(RegistryError::ThresholdExceeded {
                requested: level,
                max,
            });
        }

        let previous = self.state.threat_level;
        let mut next = self.state.clone();
        next.threat_level = level;

        self.commit(
            Vec::new(),
            Some(next),
            RegistryEvent::ThreatLevelUpdated {
                previous,
                level,
                height: ctx.height(),
            },
        )?;

        info!("[qc-18] 🚨 Threat level {} -> {}", previous, level);
        Ok(level)
    }

    fn deactivate_keys(&mut self, ctx: &ExecutionContext) -> Result<(), RegistryError> {
        let key = KeyPrefix::keys_key(&ctx.caller);
        let mut record = self.load::<KeyRecord>(&key)?.ok_or(RegistryError::NotFound {
            entity: "key record",
        })?;

        if !record.is_active {
            debug!(
                "[qc-18] keys of {} already inactive",
                short_hex(&ctx.caller)
            );
            return Ok(());
        }
        record.is_active = false;

        let ops = vec![self.update_op(key, &record)?];
        self.commit(
            ops,
            None,
            RegistryEvent::KeysDeactivated {
                principal: ctx.caller,
                height: ctx.height(),
            },
        )?;

        info!("[qc-18] 🔕 Keys of {} deactivated", short_hex(&ctx.caller));
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    fn get_keys(&self, principal: &Principal) -> Result<Option<KeyRecord>, RegistryError> {
        self.load(&KeyPrefix::keys_key(principal))
    }

    fn get_signature_status(
        &self,
        signer: &Principal,
        message_hash: &Hash,
    ) -> Result<Option<SignatureRecord>, RegistryError> {
        self.load(&KeyPrefix::signature_key(signer, message_hash))
    }

    fn get_encrypted_info(
        &self,
        owner: &Principal,
        data_id: &Hash,
    ) -> Result<Option<EncryptedRecord>, RegistryError> {
        self.load(&KeyPrefix::encrypted_key(owner, data_id))
    }

    fn get_merkle_root(&self, root_id: u64) -> Result<Option<MerkleRootRecord>, RegistryError> {
        self.load(&KeyPrefix::merkle_root_key(root_id))
    }

    fn get_hash_chain_info(
        &self,
        chain_id: &Hash,
        position: u64,
    ) -> Result<Option<HashChainLink>, RegistryError> {
        self.load(&KeyPrefix::chain_link_key(chain_id, position))
    }

    fn get_contract_stats(&self) -> RegistryStats {
        RegistryStats::from(&self.state)
    }

    fn is_quantum_resistant_signature(
        &self,
        principal: &Principal,
        message_hash: &Hash,
    ) -> Result<bool, RegistryError> {
        Ok(self
            .get_signature_status(principal, message_hash)?
            .is_some_and(|record| record.verified))
    }

    fn get_hash_chain_length(&self, chain_id: &Hash) -> Result<u64, RegistryError> {
        Ok(self
            .load::<u64>(&KeyPrefix::chain_length_key(chain_id))?
            .unwrap_or(0))
    }

    fn verify_hash_chain(&self, chain_id: &Hash) -> Result<bool, RegistryError> {
        let length = self.get_hash_chain_length(chain_id)?;
        if length == 0 {
            return Ok(false);
        }

        let mut previous: Option<HashChainLink> = None;
        for position in 0..length {
            let Some(link) = self.get_hash_chain_info(chain_id, position)? else {
                debug!(
                    "[qc-18] chain {} missing link {}",
                    short_hash(chain_id),
                    position
                );
                return Ok(false);
            };

            if link.chain_length != position + 1 {
                return Ok(false);
            }
            if let Some(prev) = &previous {
                if link.previous_hash != prev.hash_value {
                    debug!(
                        "[qc-18] chain {} broken at link {}",
                        short_hash(chain_id),
                        position
                    );
                    return Ok(false);
                }
            }
            previous = Some(link);
        }
        Ok(true)
    }
}
