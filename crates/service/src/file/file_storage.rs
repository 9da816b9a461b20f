use std::path::PathBuf;
use async_trait::async_trait;

use crate::errors::StorageError;
use crate::storage::json_map_store::JsonMapStore;
use crate::storage::kv_storage::KeyValueStorage;

/// File-backed key-value store.
/// Keeps every `key -> raw string` record in one JSON file.
#[derive(Clone)]
pub struct FileStorage {
    store: JsonMapStore<String, String>,
}

impl FileStorage {
    /// Open the store at the given file path. Creates the file if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StorageError> {
        let store = JsonMapStore::<String, String>::open(path).await?;
        Ok(Self { store })
    }

    pub fn path(&self) -> &std::path::Path { self.store.path() }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.store.get(&key.to_string()).await)
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.store.insert(key.to_string(), value).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.store.remove(&key.to_string()).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn file_storage_survives_reopen() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("svc_local_storage_{}.json", Uuid::new_v4()));
        let storage = FileStorage::open(&tmp).await?;

        storage.set_item("todos", r#"[{"id":1}]"#.to_string()).await?;
        storage.set_item("token", "abc".to_string()).await?;
        storage.remove_item("token").await?;

        // reopen from disk to ensure persistence
        let reopened = FileStorage::open(storage.path()).await?;
        assert_eq!(reopened.path(), tmp.as_path());
        assert_eq!(reopened.get_item("todos").await?.as_deref(), Some(r#"[{"id":1}]"#));
        assert_eq!(reopened.get_item("token").await?, None);

        // cleanup
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_create_is_not_visible() -> Result<(), anyhow::Error> {
        use crate::mutation::{LocalMutation, MutationOptions};
        use crate::errors::MutationError;
        use std::{sync::Arc, time::Duration};

        let tmp = std::env::temp_dir().join(format!("svc_local_storage_ro_{}.json", Uuid::new_v4()));
        let storage = FileStorage::open(&tmp).await?;
        tokio::fs::remove_file(&tmp).await?;
        tokio::fs::create_dir(&tmp).await?;

        let todos = LocalMutation::new(Arc::new(storage.clone()), "todos", MutationOptions::default())
            .with_delay(Duration::ZERO);
        let err = todos.create(serde_json::json!({"title": "a"})).await.unwrap_err();
        assert!(matches!(err, MutationError::Storage(StorageError::Io(_))));
        assert_eq!(storage.get_item("todos").await?, None);

        // once the path is writable again the next create starts a fresh collection
        tokio::fs::remove_dir(&tmp).await?;
        let out = todos.create(serde_json::json!({"title": "b"})).await?;
        assert_eq!(out.id, None);
        assert_eq!(storage.get_item("todos").await?.as_deref(), Some(r#"[{"title":"b"}]"#));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
