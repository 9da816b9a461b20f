use crate::errors::StorageError;
use async_trait::async_trait;

/// Trait abstraction for a string key-value store.
/// Values are opaque strings; JSON encoding happens above this seam.
/// Implementations can be in-memory, file-backed, or a remote KV.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
