//! Query-style read of a single storage key.

use std::{sync::Arc, time::Duration};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::StorageError;
use crate::record;
use crate::runtime::{simulate_latency, DEFAULT_DELAY};
use crate::storage::KeyValueStorage;

/// Reads one key after the emulated latency, falling back to an initial value.
#[derive(Clone)]
pub struct LocalQuery {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    initial_value: Option<Value>,
    delay: Duration,
}

impl LocalQuery {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>, initial_value: Option<Value>) -> Self {
        Self { storage, key: key.into(), initial_value, delay: DEFAULT_DELAY }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn key(&self) -> &str { &self.key }

    /// Resolve with the stored value (JSON-decoded, or the raw text when it is
    /// not JSON) or else the initial value.
    ///
    /// A falsy result (`null`, `false`, `0`, `""`, or no initial value) never
    /// resolves; wrap the call in a timeout where that matters.
    pub async fn fetch(&self) -> Result<Value, StorageError> {
        simulate_latency(self.delay).await;
        debug!(key = %self.key, event = "query", "reading stored value");

        let value = match record::present(self.storage.get_item(&self.key).await?) {
            Some(raw) => Some(record::parse_lenient(&raw)),
            None => self.initial_value.clone(),
        };

        match value {
            Some(v) if record::is_truthy(&v) => Ok(v),
            _ => {
                warn!(key = %self.key, event = "query_unsettled", "falsy value, query will not settle");
                std::future::pending().await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn query(store: &MemoryStorage, initial: Option<Value>) -> LocalQuery {
        LocalQuery::new(Arc::new(store.clone()), "settings", initial).with_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn stored_json_wins_over_initial() -> Result<(), anyhow::Error> {
        let store = MemoryStorage::with_items([("settings", r#"{"theme":"dark"}"#)]);
        let value = query(&store, Some(json!({"theme": "light"}))).fetch().await?;
        assert_eq!(value, json!({"theme": "dark"}));
        Ok(())
    }

    #[tokio::test]
    async fn plain_text_record_is_returned_raw() -> Result<(), anyhow::Error> {
        let store = MemoryStorage::with_items([("settings", "dark")]);
        assert_eq!(query(&store, None).fetch().await?, json!("dark"));
        Ok(())
    }

    #[tokio::test]
    async fn empty_storage_resolves_initial_value() -> Result<(), anyhow::Error> {
        let store = MemoryStorage::new();
        assert_eq!(query(&store, Some(json!([]))).fetch().await?, json!([]));
        assert_eq!(query(&store, Some(json!({"n": 1}))).fetch().await?, json!({"n": 1}));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn falsy_results_never_settle() {
        let store = MemoryStorage::new();
        for initial in [None, Some(json!(0)), Some(json!(false)), Some(json!("")), Some(json!(null))] {
            let q = query(&store, initial.clone());
            let res = tokio::time::timeout(Duration::from_secs(5), q.fetch()).await;
            assert!(res.is_err(), "query with initial {initial:?} should hang");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stored_zero_hangs_but_blank_uses_initial() {
        let store = MemoryStorage::with_items([("settings", "0")]);
        let res = tokio::time::timeout(Duration::from_secs(5), query(&store, Some(json!(1))).fetch()).await;
        assert!(res.is_err());

        // an empty record counts as missing, so the initial value is used
        let blank = MemoryStorage::with_items([("settings", "")]);
        let res = tokio::time::timeout(Duration::from_secs(5), query(&blank, Some(json!(1))).fetch()).await;
        assert_eq!(res.ok().and_then(|r| r.ok()), Some(json!(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_waits_for_the_delay() -> Result<(), anyhow::Error> {
        let store = MemoryStorage::with_items([("settings", "1")]);
        let q = LocalQuery::new(Arc::new(store), "settings", None);
        let start = tokio::time::Instant::now();
        assert_eq!(q.fetch().await?, json!(1));
        assert!(start.elapsed() >= DEFAULT_DELAY);
        Ok(())
    }
}
