//! Storage implementations

mod json;

pub use json::JsonStore;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::traits::Store;
use crate::application::errors::StorageError;

/// Document names end up in file paths, so keep them to one plain segment
pub(crate) fn validate_document_name(name: &str) -> Result<(), StorageError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidName(name.to_string()))
    }
}

/// In-memory store, used for tests and the `memory` backend
#[derive(Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<HashMap<String, Value>>>,
    blobs: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load_document(&self, name: &str) -> Result<Option<Value>, StorageError> {
        validate_document_name(name)?;
        let documents = self.documents.read().await;
        Ok(documents.get(name).cloned())
    }

    async fn save_document(&self, name: &str, value: &Value) -> Result<(), StorageError> {
        validate_document_name(name)?;
        let mut documents = self.documents.write().await;
        documents.insert(name.to_string(), value.clone());
        Ok(())
    }

    async fn list_documents(&self) -> Result<Vec<String>, StorageError> {
        let documents = self.documents.read().await;
        let mut names: Vec<String> = documents.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn load_blob(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let blobs = self.blobs.read().await;
        Ok(blobs.get(key).cloned())
    }

    async fn store_blob(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut blobs = self.blobs.write().await;
        blobs.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn document_round_trip() {
        let store = MemoryStore::new();
        let doc = json!({"greeting": "hi", "limits": [1, 2, 3], "nested": {"on": true}});
        store.save_document("8ball", &doc).await.unwrap();
        assert_eq!(store.load_document("8ball").await.unwrap(), Some(doc));
        assert_eq!(store.load_document("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn documents_are_listed_sorted() {
        let store = MemoryStore::new();
        store.save_document("zeta", &json!(1)).await.unwrap();
        store.save_document("alpha", &json!(2)).await.unwrap();
        assert_eq!(store.list_documents().await.unwrap(), vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn blobs_overwrite() {
        let store = MemoryStore::new();
        assert_eq!(store.load_blob("commands.options.auto_pong").await.unwrap(), None);
        store.store_blob("commands.options.auto_pong", json!(true)).await.unwrap();
        store.store_blob("commands.options.auto_pong", json!(false)).await.unwrap();
        assert_eq!(store.load_blob("commands.options.auto_pong").await.unwrap(), Some(json!(false)));
    }

    #[test]
    fn path_like_names_are_rejected() {
        for bad in ["", "../secret", "a/b", ".hidden", "with space"] {
            assert!(validate_document_name(bad).is_err(), "{:?}", bad);
        }
        for good in ["8ball", "auto_responses", "bot-config.v2"] {
            assert!(validate_document_name(good).is_ok(), "{:?}", good);
        }
    }
}
