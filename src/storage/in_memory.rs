use crate::storage::{KeyValueStore, StorageError};
use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

type Namespaces = HashMap<String, HashMap<String, String>>;

pub(crate) struct InMemoryStorage {
    storage: Mutex<Namespaces>,
}

impl InMemoryStorage {
    pub(crate) fn new() -> Self {
        Self {
            storage: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Namespaces> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStorage {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.lock();

        Ok(guard.get(namespace).and_then(|m| m.get(key)).cloned())
    }

    async fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.lock();

        guard
            .entry(namespace.into())
            .or_default()
            .insert(key.into(), value.into());

        Ok(())
    }

    async fn delete(&self, namespace: &str, key: &str) -> Result<(), StorageError> {
        let mut guard = self.lock();

        if let Entry::Occupied(mut entry) = guard.entry(namespace.into()) {
            let map = entry.get_mut();
            map.remove(key);

            if map.is_empty() {
                entry.remove();
            }
        }

        Ok(())
    }

    async fn get_all(&self, namespace: &str) -> Result<HashMap<String, String>, StorageError> {
        let guard = self.lock();

        Ok(guard.get(namespace).cloned().unwrap_or_default())
    }

    async fn clear(&self, namespace: &str) -> Result<(), StorageError> {
        self.lock().remove(namespace);

        Ok(())
    }
}
