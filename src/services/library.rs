use crate::storage::{KeyValueStore, StorageError};
use crate::types::LibraryKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

const HISTORY_NAMESPACE: &str = "history";
const WISHLIST_NAMESPACE: &str = "wishlist";
const PREFERENCES_NAMESPACE: &str = "preferences";
const THEME_KEY: &str = "theme";

pub(crate) const HISTORY_LIMIT: usize = 100;

#[derive(Debug, thiserror::Error)]
pub(crate) enum LibraryError {
    #[error(transparent)]
    StorageError(#[from] StorageError),
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct LibraryItem {
    #[serde(flatten)]
    pub(crate) key: LibraryKey,
    pub(crate) title: Option<String>,
    pub(crate) updated_at: DateTime<Utc>,
}

/// Watch history, wishlist and preferences of the single local user.
pub(crate) struct Library {
    storage: Arc<dyn KeyValueStore>,
}

impl Library {
    pub(crate) fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    async fn list(&self, namespace: &str) -> Result<Vec<LibraryItem>, LibraryError> {
        let mut items: Vec<LibraryItem> = self
            .storage
            .get_all(namespace)
            .await?
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_str(&value) {
                Ok(item) => Some(item),
                Err(error) => {
                    warn!(%namespace, %key, ?error, "Skipping unreadable library item");
                    None
                }
            })
            .collect();

        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(items)
    }

    async fn put(&self, namespace: &str, item: &LibraryItem) -> Result<(), LibraryError> {
        let value = serde_json::to_string(item)?;

        self.storage
            .set(namespace, &item.key.to_string(), &value)
            .await?;

        Ok(())
    }

    pub(crate) async fn history(&self) -> Result<Vec<LibraryItem>, LibraryError> {
        self.list(HISTORY_NAMESPACE).await
    }

    pub(crate) async fn record_view(
        &self,
        key: LibraryKey,
        title: Option<String>,
    ) -> Result<(), LibraryError> {
        self.record_view_at(key, title, Utc::now()).await
    }

    /// Re-viewing a title moves it to the front. The oldest entries beyond the limit are dropped.
    pub(crate) async fn record_view_at(
        &self,
        key: LibraryKey,
        title: Option<String>,
        viewed_at: DateTime<Utc>,
    ) -> Result<(), LibraryError> {
        debug!(%key, "Recording view");

        self.put(
            HISTORY_NAMESPACE,
            &LibraryItem {
                key,
                title,
                updated_at: viewed_at,
            },
        )
        .await?;

        let history = self.history().await?;

        for expired in history.iter().skip(HISTORY_LIMIT) {
            self.storage
                .delete(HISTORY_NAMESPACE, &expired.key.to_string())
                .await?;
        }

        Ok(())
    }

    pub(crate) async fn clear_history(&self) -> Result<(), LibraryError> {
        self.storage.clear(HISTORY_NAMESPACE).await?;

        Ok(())
    }

    pub(crate) async fn wishlist(&self) -> Result<Vec<LibraryItem>, LibraryError> {
        self.list(WISHLIST_NAMESPACE).await
    }

    pub(crate) async fn add_to_wishlist(
        &self,
        key: LibraryKey,
        title: Option<String>,
    ) -> Result<(), LibraryError> {
        self.put(
            WISHLIST_NAMESPACE,
            &LibraryItem {
                key,
                title,
                updated_at: Utc::now(),
            },
        )
        .await
    }

    pub(crate) async fn remove_from_wishlist(&self, key: &LibraryKey) -> Result<(), LibraryError> {
        self.storage
            .delete(WISHLIST_NAMESPACE, &key.to_string())
            .await?;

        Ok(())
    }

    pub(crate) async fn theme(&self) -> Result<Theme, LibraryError> {
        match self.storage.get(PREFERENCES_NAMESPACE, THEME_KEY).await? {
            Some(value) => Ok(serde_json::from_str(&value)?),
            None => Ok(Theme::default()),
        }
    }

    pub(crate) async fn set_theme(&self, theme: Theme) -> Result<(), LibraryError> {
        let value = serde_json::to_string(&theme)?;

        self.storage
            .set(PREFERENCES_NAMESPACE, THEME_KEY, &value)
            .await?;

        Ok(())
    }
}
