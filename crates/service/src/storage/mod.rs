//! Storage abstractions for service layer
//!
//! The query and mutation operations only ever see the string key-value
//! seam in [`kv_storage`]. Backends live next to it (memory) or under
//! `crate::file` (JSON file on disk).

pub mod json_map_store;
pub mod kv_storage;
pub mod memory;

pub use kv_storage::KeyValueStorage;
pub use memory::MemoryStorage;
