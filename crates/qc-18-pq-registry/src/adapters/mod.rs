//! # Adapters Layer
//!
//! Concrete implementations of the outbound ports.
//!
//! - `storage` - `InMemoryKVStore`, `FileBackedKVStore`
//! - `serializer` - `BincodeRecordSerializer`
//! - `events` - `InMemoryEventSink`, `TracingEventSink`

pub mod events;
pub mod serializer;
pub mod storage;

pub use events::{InMemoryEventSink, TracingEventSink};
pub use serializer::BincodeRecordSerializer;
pub use storage::{FileBackedKVStore, InMemoryKVStore};
