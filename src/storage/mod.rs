//! Persistence module
//!
//! A narrow key-value contract plus the snapshot adapter the timers use.

pub mod snapshot_store;
pub mod store;

pub use snapshot_store::SnapshotStore;
pub use store::{FileStore, KeyValueStore, MemoryStore};
