//! # Inbound Ports (Driving Ports / API)
//!
//! The public API of the registry: state transitions and read-only
//! queries.
//!
//! Mutations take `&mut self` and commit exactly one atomic batch each.
//! Queries take `&self` and never mutate. Absent records are `None` (or
//! `false`), never an error; only collaborator failures surface as `Err`.

use crate::domain::entities::{
    EncryptedRecord, ExecutionContext, HashChainLink, KeyRecord, MerkleRootRecord,
    RegistryStats, SignatureRecord,
};
use crate::domain::errors::RegistryError;
use crate::domain::value_objects::{Hash, Principal};

/// Primary registry API.
pub trait PqRegistryApi: Send + Sync {
    // =========================================================================
    // State Transitions
    // =========================================================================

    /// Register Dilithium/SPHINCS+/Kyber public keys for the caller.
    ///
    /// # Errors
    /// * `InvalidKeyMaterial` - any key fails its validator
    /// * `AlreadyExists` - the caller already has a key record
    fn register_keys(
        &mut self,
        ctx: &ExecutionContext,
        dilithium_key: &[u8],
        sphincs_key: &[u8],
        kyber_key: &[u8],
    ) -> Result<(), RegistryError>;

    /// Attach a verified signature to a message hash.
    ///
    /// # Errors
    /// * `NotFound` - caller has no key record
    /// * `Unauthorized` - caller's keys are deactivated
    /// * `AlreadyExists` - caller already signed this hash
    /// * `InvalidSignature` - wrong sizes or verification failed
    fn create_signature(
        &mut self,
        ctx: &ExecutionContext,
        message_hash: Hash,
        dilithium_sig: &[u8],
        sphincs_sig: &[u8],
    ) -> Result<(), RegistryError>;

    /// Store a reference to an encrypted payload.
    ///
    /// # Errors
    /// * `NotFound`, `Unauthorized`, `AlreadyExists`
    /// * `InvalidKeyMaterial` - ciphertext is not 768 bytes
    fn store_encrypted_data(
        &mut self,
        ctx: &ExecutionContext,
        data_id: Hash,
        ciphertext: &[u8],
        metadata_hash: Hash,
    ) -> Result<(), RegistryError>;

    /// Publish a Merkle root. Administrator only.
    ///
    /// # Errors
    /// * `Unauthorized`, `AlreadyExists`
    /// * `InvalidHash` - tree height or leaf count is zero
    fn create_merkle_root(
        &mut self,
        ctx: &ExecutionContext,
        root_id: u64,
        root_hash: Hash,
        tree_height: u64,
        leaf_count: u64,
    ) -> Result<(), RegistryError>;

    /// Create position 0 of a hash chain. Returns the chain hash.
    ///
    /// # Errors
    /// * `AlreadyExists` - the chain is already initialized
    fn initialize_hash_chain(
        &mut self,
        ctx: &ExecutionContext,
        chain_id: Hash,
        initial_hash: Hash,
    ) -> Result<Hash, RegistryError>;

    /// Append a link to a hash chain. Returns the new link hash.
    ///
    /// # Errors
    /// * `NotFound` - the chain has no tail
    fn extend_hash_chain(
        &mut self,
        ctx: &ExecutionContext,
        chain_id: Hash,
        new_data: &[u8],
    ) -> Result<Hash, RegistryError>;

    /// Set the global threat level. Administrator only. Returns the level.
    ///
    /// # Errors
    /// * `Unauthorized`, `ThresholdExceeded`
    fn update_threat_level(
        &mut self,
        ctx: &ExecutionContext,
        level: u32,
    ) -> Result<u32, RegistryError>;

    /// Deactivate the caller's keys. One-way.
    ///
    /// # Errors
    /// * `NotFound` - caller has no key record
    fn deactivate_keys(&mut self, ctx: &ExecutionContext) -> Result<(), RegistryError>;

    // =========================================================================
    // Queries
    // =========================================================================

    fn get_keys(&self, principal: &Principal) -> Result<Option<KeyRecord>, RegistryError>;

    fn get_signature_status(
        &self,
        signer: &Principal,
        message_hash: &Hash,
    ) -> Result<Option<SignatureRecord>, RegistryError>;

    fn get_encrypted_info(
        &self,
        owner: &Principal,
        data_id: &Hash,
    ) -> Result<Option<EncryptedRecord>, RegistryError>;

    fn get_merkle_root(&self, root_id: u64) -> Result<Option<MerkleRootRecord>, RegistryError>;

    fn get_hash_chain_info(
        &self,
        chain_id: &Hash,
        position: u64,
    ) -> Result<Option<HashChainLink>, RegistryError>;

    /// Total registered keys and current threat level.
    fn get_contract_stats(&self) -> RegistryStats;

    /// True iff a verified signature exists for the pair.
    fn is_quantum_resistant_signature(
        &self,
        principal: &Principal,
        message_hash: &Hash,
    ) -> Result<bool, RegistryError>;

    /// Number of links in a chain, 0 when the chain does not exist.
    fn get_hash_chain_length(&self, chain_id: &Hash) -> Result<u64, RegistryError>;

    /// Walk every link and check the previous-hash linkage.
    fn verify_hash_chain(&self, chain_id: &Hash) -> Result<bool, RegistryError>;
}
