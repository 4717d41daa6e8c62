//! # Domain Layer
//!
//! Pure registry logic: records, counters, validators, the chained hash
//! primitive and the error taxonomy. No I/O lives here.
//!
//! ## Modules
//!
//! - `entities` - Table records, `GlobalState`, execution context
//! - `value_objects` - Size contracts, key layout, configuration
//! - `validators` - Structural key/ciphertext checks
//! - `hashing` - `post_quantum_hash`, freshness nonces, lattice stand-in
//! - `errors` - `RegistryError` and collaborator errors

pub mod entities;
pub mod errors;
pub mod hashing;
pub mod validators;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
