use crate::storage::{KeyValueStore, StorageError};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs::create_dir_all;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// One directory per namespace, one file per key. File names are url-safe base64 of the key.
pub(crate) struct OnDiskStorage {
    path: PathBuf,
}

impl OnDiskStorage {
    pub(crate) fn create(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn namespace_path(&self, namespace: &str) -> PathBuf {
        self.path.join(URL_SAFE_NO_PAD.encode(namespace))
    }

    fn key_path(&self, namespace: &str, key: &str) -> PathBuf {
        self.namespace_path(namespace).join(URL_SAFE_NO_PAD.encode(key))
    }
}

#[async_trait]
impl KeyValueStore for OnDiskStorage {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.key_path(namespace, key)).await {
            Ok(value) => Ok(Some(value)),
            Err(error) if matches!(error.kind(), ErrorKind::NotFound) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError> {
        create_dir_all(self.namespace_path(namespace)).await?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.key_path(namespace, key))
            .await?;

        file.write_all(value.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }

    async fn delete(&self, namespace: &str, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.key_path(namespace, key)).await {
            Err(error) if !matches!(error.kind(), ErrorKind::NotFound) => Err(error.into()),
            _ => Ok(()),
        }
    }

    async fn get_all(&self, namespace: &str) -> Result<HashMap<String, String>, StorageError> {
        let path = self.namespace_path(namespace);

        let mut map = HashMap::new();

        let mut dir_reader = match tokio::fs::read_dir(&path).await {
            Ok(reader) => reader,
            Err(error) if matches!(error.kind(), ErrorKind::NotFound) => return Ok(map),
            Err(error) => return Err(error.into()),
        };

        while let Some(entry) = dir_reader.next_entry().await? {
            let filename = entry.file_name().to_string_lossy().to_string();
            let key = match URL_SAFE_NO_PAD
                .decode(&filename)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
            {
                Some(key) => key,
                None => {
                    warn!(%filename, %namespace, "Skipping file with undecodable name");
                    continue;
                }
            };
            let content = tokio::fs::read_to_string(entry.path()).await?;
            map.insert(key, content);
        }

        Ok(map)
    }

    async fn clear(&self, namespace: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_dir_all(self.namespace_path(namespace)).await {
            Err(error) if !matches!(error.kind(), ErrorKind::NotFound) => Err(error.into()),
            _ => Ok(()),
        }
    }
}
