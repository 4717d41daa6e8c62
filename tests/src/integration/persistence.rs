//! # Persistence Flows
//!
//! A registry backed by `FileBackedKVStore` is closed and reopened from
//! disk.
//!
//! ## Flow Tested:
//!
//! 1. **Bootstrap**: the first open persists the administrator
//! 2. **Reopen**: records, counters and the administrator survive
//! 3. **Freshness**: the nonce counter continues, so chains initialized
//!    after a restart in the same block still get distinct hashes

#[cfg(test)]
mod tests {
    use qc_18_pq_registry::prelude::*;
    use std::path::Path;

    const ADMIN: Principal = [0xAD; 32];
    const OTHER_ADMIN: Principal = [0x0D; 32];
    const ALICE: Principal = [0xA1; 32];

    type FileRegistry = PqRegistryService<
        FileBackedKVStore,
        BincodeRecordSerializer,
        SimulatedPqCrypto,
        InMemoryEventSink,
    >;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn open(path: &Path, admin: Principal) -> FileRegistry {
        let deps = RegistryDependencies {
            kv_store: FileBackedKVStore::open(path).unwrap(),
            serializer: BincodeRecordSerializer,
            crypto: SimulatedPqCrypto,
            events: InMemoryEventSink::new(),
        };
        PqRegistryService::new(deps, RegistryConfig::new(admin)).unwrap()
    }

    fn ctx(caller: Principal, height: u64) -> ExecutionContext {
        ExecutionContext::new(caller, BlockContext::new(height, 1_700_000_000, [0x42; 32]))
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[test]
    fn test_reopen_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.db");
        let chain_id = [0xC0; 32];

        let first_hash = {
            let mut registry = open(&path, ADMIN);
            registry
                .register_keys(&ctx(ALICE, 1), &[0x11; 1312], &[0x22; 32], &[0x33; 800])
                .unwrap();
            registry.update_threat_level(&ctx(ADMIN, 1), 7).unwrap();
            registry
                .create_merkle_root(&ctx(ADMIN, 1), 9, [0xEE; 32], 4, 16)
                .unwrap();
            let head = registry
                .initialize_hash_chain(&ctx(ALICE, 1), chain_id, [0x01; 32])
                .unwrap();
            registry.extend_hash_chain(&ctx(ALICE, 1), chain_id, b"one").unwrap();
            head
        };

        let mut registry = open(&path, OTHER_ADMIN);
        assert_eq!(registry.administrator(), &ADMIN);
        assert_eq!(registry.get_contract_stats().total_keys, 1);
        assert_eq!(registry.get_contract_stats().threat_level, 7);
        assert_eq!(registry.global_state().freshness_counter, 1);
        assert!(registry.get_keys(&ALICE).unwrap().unwrap().is_active);
        assert_eq!(registry.get_merkle_root(9).unwrap().unwrap().leaf_count, 16);
        assert_eq!(
            registry.get_hash_chain_info(&chain_id, 0).unwrap().unwrap().hash_value,
            first_hash
        );

        // The persisted administrator still gates admin-only operations.
        let denied = registry.update_threat_level(&ctx(OTHER_ADMIN, 2), 1);
        assert_eq!(denied.unwrap_err().kind(), ErrorKind::Unauthorized);

        let next = registry.extend_hash_chain(&ctx(ALICE, 2), chain_id, b"two").unwrap();
        assert_eq!(registry.get_hash_chain_length(&chain_id).unwrap(), 3);
        assert_eq!(
            registry.get_hash_chain_info(&chain_id, 2).unwrap().unwrap().hash_value,
            next
        );
        assert!(registry.verify_hash_chain(&chain_id).unwrap());
    }

    #[test]
    fn test_freshness_counter_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.db");

        let before = {
            let mut registry = open(&path, ADMIN);
            registry
                .initialize_hash_chain(&ctx(ALICE, 5), [0xA0; 32], [0x01; 32])
                .unwrap()
        };

        let mut registry = open(&path, ADMIN);
        let after = registry
            .initialize_hash_chain(&ctx(ALICE, 5), [0xA1; 32], [0x01; 32])
            .unwrap();

        assert_ne!(before, after);
        assert_eq!(registry.global_state().freshness_counter, 2);
    }
}
