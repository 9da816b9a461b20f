//! Mutation-style create, edit and delete against a single storage key.
//!
//! Every call reads the record, changes it in memory and writes the whole
//! record back. Calls are independent: two mutations on the same key that
//! overlap both read the same record and the later write wins.

use std::{sync::Arc, time::Duration};
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::MutationError;
use crate::record;
use crate::runtime::{simulate_latency, DEFAULT_DELAY};
use crate::storage::KeyValueStorage;
use crate::types::MutationOutcome;

/// How a key's record is interpreted by the mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOptions {
    /// Field naming each item's identifier in collection mode
    pub id_key: String,
    /// Treat the record as an array of identified items
    pub collection: bool,
}

impl Default for MutationOptions {
    fn default() -> Self { Self { id_key: "id".to_string(), collection: true } }
}

impl MutationOptions {
    pub fn single() -> Self { Self { collection: false, ..Self::default() } }
}

#[derive(Clone)]
pub struct LocalMutation {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    options: MutationOptions,
    delay: Duration,
}

impl LocalMutation {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>, options: MutationOptions) -> Self {
        Self { storage, key: key.into(), options, delay: DEFAULT_DELAY }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn key(&self) -> &str { &self.key }

    pub fn options(&self) -> &MutationOptions { &self.options }

    async fn load(&self) -> Result<Option<String>, MutationError> {
        Ok(record::present(self.storage.get_item(&self.key).await?))
    }

    async fn store(&self, raw: String) -> Result<(), MutationError> {
        self.storage.set_item(&self.key, raw).await?;
        Ok(())
    }

    /// Create the record, or append to an existing collection.
    ///
    /// Appending assigns `max(identifier) + 1` and resolves with the new item
    /// and its id. A first write stores the value as-is (or wrapped in an
    /// array in collection mode) and assigns no id.
    pub async fn create(&self, value: Value) -> Result<MutationOutcome, MutationError> {
        simulate_latency(self.delay).await;
        let id_key = self.options.id_key.as_str();
        debug!(key = %self.key, event = "create", collection = self.options.collection, "create mutation");

        let Some(raw) = self.load().await? else {
            let encoded = if self.options.collection {
                Value::Array(vec![value.clone()]).to_string()
            } else {
                record::encode_single(&value)
            };
            self.store(encoded).await?;
            info!(key = %self.key, event = "created", "stored first record");
            return Ok(MutationOutcome::with_data(value));
        };

        if !self.options.collection {
            return Err(MutationError::AlreadyExists);
        }

        let Value::Array(mut items) = serde_json::from_str::<Value>(&raw)? else {
            return Err(MutationError::NotAnArray);
        };

        let next_id = record::max_identifier(&items, id_key)
            .and_then(|max| max.checked_add(1))
            .ok_or_else(|| MutationError::invalid_identifier(id_key))?;

        let mut item = record::spread_object(&value);
        item.insert(id_key.to_string(), Value::from(next_id));
        let item = Value::Object(item);
        items.push(item.clone());
        self.store(Value::Array(items).to_string()).await?;

        info!(key = %self.key, event = "created", id = next_id, "appended item to collection");
        Ok(MutationOutcome { data: Some(item), id: Some(next_id) })
    }

    /// Replace an existing record.
    ///
    /// Collection mode only accepts an array input. It replaces every stored
    /// item whose identifier equals the input's `id` property with the input
    /// and resolves with the whole collection. Outside collection mode the
    /// record is overwritten unconditionally.
    pub async fn edit(&self, value: Value) -> Result<MutationOutcome, MutationError> {
        simulate_latency(self.delay).await;
        let id_key = self.options.id_key.as_str();
        debug!(key = %self.key, event = "edit", collection = self.options.collection, "edit mutation");

        let raw = self.load().await?.ok_or(MutationError::ItemNotFound)?;

        if !self.options.collection {
            self.store(record::encode_single(&value)).await?;
            info!(key = %self.key, event = "edited", "overwrote record");
            return Ok(MutationOutcome::with_data(value));
        }

        if !value.is_array() {
            return Err(MutationError::NotAnArray);
        }
        let Value::Array(items) = serde_json::from_str::<Value>(&raw)? else {
            return Err(MutationError::NotAnArray);
        };

        // Arrays carry no `id` property, so only items lacking the identifier match.
        let target = value.get("id");
        let mut found = false;
        let updated: Vec<Value> = items
            .into_iter()
            .map(|item| {
                if item.get(id_key) == target {
                    found = true;
                    value.clone()
                } else {
                    item
                }
            })
            .collect();
        if !found {
            return Err(MutationError::ItemNotFound);
        }

        let updated = Value::Array(updated);
        self.store(updated.to_string()).await?;
        info!(key = %self.key, event = "edited", "rewrote collection");
        Ok(MutationOutcome::with_data(updated))
    }

    /// Remove the whole record. The identifier is accepted but not used to
    /// select an item.
    pub async fn delete(&self, id: Option<Value>) -> Result<MutationOutcome, MutationError> {
        simulate_latency(self.delay).await;
        debug!(key = %self.key, event = "delete", id = ?id, "delete mutation");

        if self.load().await?.is_none() {
            return Err(MutationError::ItemNotFound);
        }
        self.storage.remove_item(&self.key).await?;
        info!(key = %self.key, event = "deleted", "removed record");
        Ok(MutationOutcome::default())
    }
}
