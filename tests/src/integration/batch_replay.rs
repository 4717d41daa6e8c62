//! # Batch Replay Flows
//!
//! A JSON batch is decoded and applied to a registry, and the committed
//! events are checked against the per-entry results.
//!
//! ## Flow Tested:
//!
//! 1. **Decode**: hex-encoded JSON entries become `BatchEntry` values
//! 2. **Apply**: entries run in order, failures do not stop later entries
//! 3. **Observe**: one event per committed entry, none for failures

#[cfg(test)]
mod tests {
    use qc_18_pq_registry::prelude::*;
    use serde_json::json;

    const ADMIN: Principal = [0xAD; 32];
    const ALICE: Principal = [0xA1; 32];

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn registry() -> InMemoryPqRegistry {
        InMemoryPqRegistry::in_memory(RegistryConfig::new(ADMIN)).unwrap()
    }

    fn batch_json() -> serde_json::Value {
        let alice = hex::encode(ALICE);
        let admin = hex::encode(ADMIN);
        let chain = hex::encode([0xC0u8; 32]);
        json!([
            {
                "caller": alice,
                "command": {
                    "op": "register_keys",
                    "dilithium_key": hex::encode([0x11u8; 1312]),
                    "sphincs_key": hex::encode([0x22u8; 32]),
                    "kyber_key": hex::encode([0x33u8; 800])
                }
            },
            {
                "caller": alice,
                "command": {
                    "op": "store_encrypted_data",
                    "data_id": hex::encode([0xDAu8; 32]),
                    "ciphertext": hex::encode([0x66u8; 768]),
                    "metadata_hash": hex::encode([0x3Eu8; 32])
                }
            },
            {
                "caller": alice,
                "command": {
                    "op": "create_merkle_root",
                    "root_id": 1,
                    "root_hash": hex::encode([0xEEu8; 32]),
                    "tree_height": 10,
                    "leaf_count": 1024
                }
            },
            {
                "caller": admin,
                "command": {
                    "op": "create_merkle_root",
                    "root_id": 1,
                    "root_hash": hex::encode([0xEEu8; 32]),
                    "tree_height": 10,
                    "leaf_count": 1024
                }
            },
            {
                "caller": alice,
                "command": { "op": "initialize_hash_chain", "chain_id": chain, "initial_hash": hex::encode([0u8; 32]) }
            },
            {
                "caller": alice,
                "command": { "op": "extend_hash_chain", "chain_id": chain, "new_data": "deadbeef" }
            },
            {
                "caller": admin,
                "command": { "op": "update_threat_level", "level": 11 }
            },
            {
                "caller": alice,
                "command": { "op": "deactivate_keys" }
            }
        ])
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[test]
    fn test_json_batch_replay() {
        let mut registry = registry();
        let entries: Vec<BatchEntry> = serde_json::from_value(batch_json()).unwrap();
        let block = BlockContext::new(12, 1_700_000_144, [0x42; 32]);

        let results = registry.apply_batch(&block, entries);
        let kinds: Vec<Option<ErrorKind>> = results
            .iter()
            .map(|r| r.as_ref().err().map(RegistryError::kind))
            .collect();

        assert_eq!(
            kinds,
            vec![
                None,
                None,
                Some(ErrorKind::Unauthorized),
                None,
                None,
                None,
                Some(ErrorKind::ThresholdExceeded),
                None,
            ]
        );

        let keys = registry.get_keys(&ALICE).unwrap().unwrap();
        assert!(!keys.is_active);
        assert_eq!(keys.registration_height, 12);
        assert!(registry.get_merkle_root(1).unwrap().is_some());
        assert!(registry.verify_hash_chain(&[0xC0; 32]).unwrap());

        let stats = registry.get_contract_stats();
        assert_eq!(stats.total_keys, 1);
        assert_eq!(stats.threat_level, 0);
    }

    #[test]
    fn test_events_match_committed_entries() {
        let mut registry = registry();
        let entries: Vec<BatchEntry> = serde_json::from_value(batch_json()).unwrap();
        let block = BlockContext::new(12, 1_700_000_144, [0x42; 32]);

        let results = registry.apply_batch(&block, entries);
        let committed = results.iter().filter(|r| r.is_ok()).count();

        let events = registry.event_sink().drain();
        assert_eq!(events.len(), committed);
        assert!(events.iter().all(|e| e.height() == 12));

        let topics_seen: Vec<&str> = events.iter().map(RegistryEvent::topic).collect();
        assert_eq!(
            topics_seen,
            vec![
                topics::KEYS_REGISTERED,
                topics::ENCRYPTED_DATA_STORED,
                topics::MERKLE_ROOT_CREATED,
                topics::HASH_CHAIN_INITIALIZED,
                topics::HASH_CHAIN_EXTENDED,
                topics::KEYS_DEACTIVATED,
            ]
        );
    }

    #[test]
    fn test_outcomes_serialize_for_reports() {
        let mut registry = registry();
        let entries: Vec<BatchEntry> = serde_json::from_value(batch_json()).unwrap();
        let block = BlockContext::new(12, 1_700_000_144, [0x42; 32]);

        let results = registry.apply_batch(&block, entries);
        let chain_hash = results[4].clone().unwrap();
        let value = serde_json::to_value(&chain_hash).unwrap();

        assert_eq!(value["outcome"], "chain_hash");
        assert_eq!(value["hash"].as_str().map(str::len), Some(64));
    }
}
