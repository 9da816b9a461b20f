use std::{sync::Arc, time::Duration};
use configs::{StorageBackend, StorageConfig, DEFAULT_FILE_PATH};
use serde_json::Value;
use tracing::info;

use crate::errors::StorageError;
use crate::file::FileStorage;
use crate::mutation::{LocalMutation, MutationOptions};
use crate::query::LocalQuery;
use crate::runtime::DEFAULT_DELAY;
use crate::storage::{KeyValueStorage, MemoryStorage};

/// Entry point binding one storage backend and latency to per-key queries
/// and mutations.
#[derive(Clone)]
pub struct LocalStore {
    storage: Arc<dyn KeyValueStorage>,
    delay: Duration,
    defaults: MutationOptions,
}

impl LocalStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage, delay: DEFAULT_DELAY, defaults: MutationOptions::default() }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Build the backend named by the configuration.
    pub async fn from_config(cfg: &StorageConfig) -> Result<Self, StorageError> {
        let storage: Arc<dyn KeyValueStorage> = match cfg.backend {
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
            StorageBackend::File => {
                let path = cfg.file_path.as_deref().unwrap_or(DEFAULT_FILE_PATH);
                Arc::new(FileStorage::open(path).await?)
            }
        };
        info!(backend = ?cfg.backend, delay_ms = cfg.delay_ms, event = "store_ready", "local store initialized");
        Ok(Self {
            storage,
            delay: cfg.delay(),
            defaults: MutationOptions { id_key: cfg.id_key.clone(), collection: cfg.collection },
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_defaults(mut self, defaults: MutationOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn storage(&self) -> Arc<dyn KeyValueStorage> { self.storage.clone() }

    pub fn delay(&self) -> Duration { self.delay }

    pub fn query(&self, key: impl Into<String>, initial_value: Option<Value>) -> LocalQuery {
        LocalQuery::new(self.storage.clone(), key, initial_value).with_delay(self.delay)
    }

    /// Mutations for `key` using the store's default options.
    pub fn mutation(&self, key: impl Into<String>) -> LocalMutation {
        self.mutation_with(key, self.defaults.clone())
    }

    pub fn mutation_with(&self, key: impl Into<String>, options: MutationOptions) -> LocalMutation {
        LocalMutation::new(self.storage.clone(), key, options).with_delay(self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn config_drives_backend_and_defaults() -> Result<(), anyhow::Error> {
        let mut app = configs::load_from_str("[storage]\ndelay_ms = 0\nid_key = \"key\"\ncollection = true\n")?;
        app.normalize_and_validate()?;
        let store = LocalStore::from_config(&app.storage).await?;
        assert_eq!(store.delay(), Duration::ZERO);

        let m = store.mutation("rows");
        assert_eq!(m.options().id_key, "key");
        m.create(json!({"v": 1})).await?;
        let out = m.create(json!({"v": 2})).await;
        // the first item has no `key` field, so there is no maximum
        assert!(out.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn queries_and_mutations_share_storage() -> Result<(), anyhow::Error> {
        let store = LocalStore::in_memory().with_delay(Duration::ZERO);
        store.mutation_with("theme", MutationOptions::single()).create(json!("dark")).await?;
        assert_eq!(store.query("theme", None).fetch().await?, json!("dark"));
        assert_eq!(store.storage().get_item("theme").await?.as_deref(), Some("dark"));
        Ok(())
    }
}
