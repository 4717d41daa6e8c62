//! # Domain Errors
//!
//! Error types for the registry.
//!
//! Every failure is returned, never thrown. Each domain variant maps to one
//! tag of the seven-way taxonomy exposed by [`ErrorKind`]; the remaining
//! variants report collaborator failures or an unusable configuration.

use crate::domain::value_objects::{Hash, Principal};
use thiserror::Error;

/// Errors returned by registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller is not the administrator, or its key material is inactive.
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: &'static str },

    /// Signature size or verification check failed.
    #[error("Invalid signature: {reason}")]
    InvalidSignature { reason: &'static str },

    /// Structural hash/bound validation failed.
    #[error("Invalid hash parameters: tree_height={tree_height}, leaf_count={leaf_count}")]
    InvalidHash { tree_height: u64, leaf_count: u64 },

    /// Key or ciphertext failed its validator.
    #[error("Invalid key material: {material}")]
    InvalidKeyMaterial { material: &'static str },

    /// Uniqueness precondition violated.
    #[error("{entity} already exists")]
    AlreadyExists { entity: &'static str },

    /// Required prior record absent.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// Requested threat level above the fixed maximum.
    #[error("Threat level {requested} exceeds maximum {max}")]
    ThresholdExceeded { requested: u32, max: u32 },

    /// Persistence collaborator failed.
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Record encoding or decoding failed.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// The service cannot start with the supplied configuration.
    #[error("Configuration error: {message}")]
    Configuration { message: &'static str },
}

/// Fieldless tag for matching on the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    InvalidSignature,
    InvalidHash,
    InvalidKeyMaterial,
    AlreadyExists,
    NotFound,
    ThresholdExceeded,
    Storage,
    Serialization,
    Configuration,
}

impl RegistryError {
    /// The taxonomy tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::Unauthorized { .. } => ErrorKind::Unauthorized,
            RegistryError::InvalidSignature { .. } => ErrorKind::InvalidSignature,
            RegistryError::InvalidHash { .. } => ErrorKind::InvalidHash,
            RegistryError::InvalidKeyMaterial { .. } => ErrorKind::InvalidKeyMaterial,
            RegistryError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            RegistryError::NotFound { .. } => ErrorKind::NotFound,
            RegistryError::ThresholdExceeded { .. } => ErrorKind::ThresholdExceeded,
            RegistryError::Storage { .. } => ErrorKind::Storage,
            RegistryError::Serialization { .. } => ErrorKind::Serialization,
            RegistryError::Configuration { .. } => ErrorKind::Configuration,
        }
    }

    /// Returns true for failures caused by the caller's input rather than
    /// a collaborator.
    pub fn is_domain_error(&self) -> bool {
        !matches!(
            self,
            RegistryError::Storage { .. }
                | RegistryError::Serialization { .. }
                | RegistryError::Configuration { .. }
        )
    }
}

/// Key-value store errors.
#[derive(Debug, Clone, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },
    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
    /// Batch inserted a key that is already present.
    #[error("KV store key {key} already present")]
    KeyExists { key: String },
    /// Batch updated a key that is absent.
    #[error("KV store key {key} not present")]
    KeyMissing { key: String },
}

impl From<KVStoreError> for RegistryError {
    fn from(err: KVStoreError) -> Self {
        RegistryError::Storage {
            message: err.to_string(),
        }
    }
}

/// Serialization errors.
#[derive(Debug, Clone, Error)]
#[error("Serialization error: {message}")]
pub struct SerializationError {
    pub message: String,
}

impl From<SerializationError> for RegistryError {
    fn from(err: SerializationError) -> Self {
        RegistryError::Serialization {
            message: err.message,
        }
    }
}

/// Short hex form of an identifier for log lines.
pub(crate) fn short_hex(bytes: &Principal) -> String {
    hex::encode(&bytes[..4])
}

/// Same as [`short_hex`] for hashes.
pub(crate) fn short_hash(hash: &Hash) -> String {
    hex::encode(&hash[..8])
}
