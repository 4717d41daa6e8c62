//! Cross-component registry flows.

pub mod batch_replay;
pub mod persistence;
