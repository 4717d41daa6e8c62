//! # Structural Validators
//!
//! Pure predicates over raw key and ciphertext buffers.
//!
//! These check byte length and a simple numeric heuristic only. They do not
//! verify any lattice or hash-based property of the material; a real scheme
//! implementation plugs in behind `PqCryptoProvider` instead.

use crate::domain::value_objects::{
    DILITHIUM_PUBLIC_KEY_SIZE, DILITHIUM_SIGNATURE_SIZE, KYBER_CIPHERTEXT_SIZE,
    KYBER_PUBLIC_KEY_SIZE, SPHINCS_PUBLIC_KEY_SIZE, SPHINCS_SIGNATURE_SIZE,
};

/// Big-endian integer formed by the first 8 bytes, if present.
fn leading_u64(buf: &[u8]) -> Option<u64> {
    let head: [u8; 8] = buf.get(..8)?.try_into().ok()?;
    Some(u64::from_be_bytes(head))
}

/// 1312 bytes with a nonzero leading 8-byte word.
pub fn validate_dilithium_key(buf: &[u8]) -> bool {
    buf.len() == DILITHIUM_PUBLIC_KEY_SIZE && leading_u64(buf).is_some_and(|v| v != 0)
}

/// 32 bytes, not all zero.
pub fn validate_sphincs_key(buf: &[u8]) -> bool {
    buf.len() == SPHINCS_PUBLIC_KEY_SIZE && buf.iter().any(|&b| b != 0)
}

/// 800 bytes with a nonzero leading 8-byte word.
pub fn validate_kyber_key(buf: &[u8]) -> bool {
    buf.len() == KYBER_PUBLIC_KEY_SIZE && leading_u64(buf).is_some_and(|v| v != 0)
}

/// 768 bytes.
pub fn validate_kyber_ciphertext(buf: &[u8]) -> bool {
    buf.len() == KYBER_CIPHERTEXT_SIZE
}

/// Both signature buffers have their fixed sizes.
pub fn validate_signature_sizes(dilithium_sig: &[u8], sphincs_sig: &[u8]) -> bool {
    dilithium_sig.len() == DILITHIUM_SIGNATURE_SIZE && sphincs_sig.len() == SPHINCS_SIGNATURE_SIZE
}
