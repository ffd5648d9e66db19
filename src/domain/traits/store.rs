use async_trait::async_trait;
use serde_json::Value;
use crate::application::errors::StorageError;

/// Store trait - abstraction for data persistence
///
/// Documents are named structured values (setting files); blobs are small
/// values under dotted keys such as `commands.options.auto_pong`.
#[async_trait]
pub trait Store: Send + Sync {
    // Document operations
    async fn load_document(&self, name: &str) -> Result<Option<Value>, StorageError>;
    async fn save_document(&self, name: &str, value: &Value) -> Result<(), StorageError>;
    async fn list_documents(&self) -> Result<Vec<String>, StorageError>;

    // Key-value operations
    async fn load_blob(&self, key: &str) -> Result<Option<Value>, StorageError>;
    async fn store_blob(&self, key: &str, value: Value) -> Result<(), StorageError>;
}
