//! File-based storage: one JSON file per document plus a shared blob cache file

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::validate_document_name;
use crate::application::errors::StorageError;
use crate::domain::traits::Store;

const DOCUMENT_DIR: &str = "json";
const CACHE_FILE: &str = "cache.json";

/// JSON file-based store
///
/// Layout under `base_path`:
/// - `json/<name>.json` for documents
/// - `cache.json` for blobs, a single object keyed by blob key
pub struct JsonStore {
    base_path: PathBuf,
    // Guards load-modify-save of the cache file
    cache_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            cache_lock: Mutex::new(()),
        }
    }

    pub async fn init(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(self.document_dir()).await?;
        Ok(())
    }

    fn document_dir(&self) -> PathBuf {
        self.base_path.join(DOCUMENT_DIR)
    }

    fn document_path(&self, name: &str) -> PathBuf {
        self.document_dir().join(format!("{}.json", name))
    }

    fn cache_path(&self) -> PathBuf {
        self.base_path.join(CACHE_FILE)
    }

    async fn read_json(path: &Path) -> Result<Option<Value>, StorageError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    /// Write through a temporary file so readers never see a partial document
    async fn write_json(path: &Path, value: &Value) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn read_cache(&self) -> Result<Map<String, Value>, StorageError> {
        match Self::read_json(&self.cache_path()).await? {
            Some(Value::Object(map)) => Ok(map),
            Some(_) => {
                tracing::warn!("{} is not an object, starting fresh", self.cache_path().display());
                Ok(Map::new())
            }
            None => Ok(Map::new()),
        }
    }
}

#[async_trait]
impl Store for JsonStore {
    async fn load_document(&self, name: &str) -> Result<Option<Value>, StorageError> {
        validate_document_name(name)?;
        Self::read_json(&self.document_path(name)).await
    }

    async fn save_document(&self, name: &str, value: &Value) -> Result<(), StorageError> {
        validate_document_name(name)?;
        Self::write_json(&self.document_path(name), value).await
    }

    async fn list_documents(&self) -> Result<Vec<String>, StorageError> {
        let mut entries = match tokio::fs::read_dir(self.document_dir()).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn load_blob(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let _guard = self.cache_lock.lock().await;
        let cache = self.read_cache().await?;
        Ok(cache.get(key).cloned())
    }

    async fn store_blob(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let _guard = self.cache_lock.lock().await;
        let mut cache = self.read_cache().await?;
        cache.insert(key.to_string(), value);
        Self::write_json(&self.cache_path(), &Value::Object(cache)).await
    }
}
