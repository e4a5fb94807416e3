mod in_memory;
pub(crate) mod on_disk;

use async_trait::async_trait;
use std::collections::HashMap;

pub(crate) use in_memory::InMemoryStorage;

#[derive(Debug, thiserror::Error)]
pub(crate) enum StorageError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Namespaced string storage backing the user library.
#[async_trait]
pub(crate) trait KeyValueStore: Send + Sync {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError>;

    async fn delete(&self, namespace: &str, key: &str) -> Result<(), StorageError>;

    async fn get_all(&self, namespace: &str) -> Result<HashMap<String, String>, StorageError>;

    async fn clear(&self, namespace: &str) -> Result<(), StorageError>;
}
