use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Which key-value backend holds the stored records.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map, lost on exit
    #[default]
    Memory,
    /// Whole map persisted to one JSON file
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub file_path: Option<String>,
    /// Artificial latency applied before every query and mutation
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_id_key")]
    pub id_key: String,
    #[serde(default = "default_collection")]
    pub collection: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            file_path: None,
            delay_ms: default_delay_ms(),
            id_key: default_id_key(),
            collection: default_collection(),
        }
    }
}

fn default_delay_ms() -> u64 { 1000 }
fn default_id_key() -> String { "id".to_string() }
fn default_collection() -> bool { true }

pub const DEFAULT_FILE_PATH: &str = "data/local_storage.json";

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.storage.normalize();
        self.storage.validate()?;
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize(&mut self) {
        // 文件后端未给出路径时使用默认数据文件
        if self.backend == StorageBackend::File {
            let blank = self.file_path.as_deref().map(|p| p.trim().is_empty()).unwrap_or(true);
            if blank {
                self.file_path = Some(DEFAULT_FILE_PATH.to_string());
            }
        }
        self.id_key = self.id_key.trim().to_string();
    }

    pub fn validate(&self) -> Result<()> {
        if self.id_key.is_empty() {
            return Err(anyhow!("storage.id_key must not be blank"));
        }
        if self.backend == StorageBackend::File && self.file_path.is_none() {
            return Err(anyhow!("storage.file_path is required for the file backend"));
        }
        Ok(())
    }

    pub fn delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.delay_ms)
    }
}
