use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::warn;

use crate::errors::StorageError;

/// Generic JSON file-backed map.
///
/// Holds a `HashMap<K, V>` in memory and rewrites the whole file after every
/// change. A change only becomes visible once its write succeeded. A
/// corrupt file is copied aside to `<path>.corrupt` and the map starts empty.
#[derive(Clone)]
pub struct JsonMapStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Load the map from `path`, creating the file with an empty map if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StorageError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    let backup = corrupt_backup_path(&file_path);
                    fs::write(&backup, &bytes).await.map_err(|e| StorageError::Io(e.to_string()))?;
                    warn!(
                        path = %file_path.display(),
                        backup = %backup.display(),
                        error = %e,
                        "corrupt map file, kept a copy and starting empty"
                    );
                    HashMap::new()
                }
            },
            Err(_) => {
                let empty: HashMap<K, V> = HashMap::new();
                write_map(&file_path, &empty).await?;
                empty
            }
        };

        Ok(Self { inner: Arc::new(RwLock::new(map)), file_path })
    }

    pub fn path(&self) -> &std::path::Path { &self.file_path }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Insert or replace a value and persist.
    pub async fn insert(&self, key: K, value: V) -> Result<(), StorageError> {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        next.insert(key, value);
        write_map(&self.file_path, &next).await?;
        *map = next;
        Ok(())
    }

    /// Remove a key and persist; returns whether it existed.
    pub async fn remove(&self, key: &K) -> Result<bool, StorageError> {
        let mut map = self.inner.write().await;
        if !map.contains_key(key) {
            return Ok(false);
        }
        let mut next = map.clone();
        next.remove(key);
        write_map(&self.file_path, &next).await?;
        *map = next;
        Ok(true)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

pub fn corrupt_backup_path(path: &std::path::Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".corrupt");
    PathBuf::from(name)
}

// Called with the write guard held.
async fn write_map<K, V>(path: &std::path::Path, map: &HashMap<K, V>) -> Result<(), StorageError>
where
    K: Eq + Hash + serde::Serialize,
    V: serde::Serialize,
{
    let data = serde_json::to_vec(map).map_err(|e| StorageError::Encoding(e.to_string()))?;
    fs::write(path, data).await.map_err(|e| StorageError::Io(e.to_string()))
}
