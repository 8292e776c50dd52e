//! Directory-backed key-value store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{HistoryStore, decode, encode};
use crate::error::PersistenceError;
use crate::session::ChatHistory;

/// Stores the transcript as `<dir>/<key>.json`.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// reader never observes a half-written transcript.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    tmp_path: PathBuf,
}

impl FileStore {
    /// Create a store for `key` inside `dir`. The directory is created on
    /// first save.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            path: dir.join(format!("{key}.json")),
            tmp_path: dir.join(format!(".{key}.json.tmp")),
        }
    }

    /// Location of the stored transcript.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryStore for FileStore {
    async fn save(&self, history: &ChatHistory) -> Result<(), PersistenceError> {
        let data = encode(history)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.tmp_path, data).await?;
        tokio::fs::rename(&self.tmp_path, &self.path).await?;

        tracing::debug!(
            path = %self.path.display(),
            message_count = history.len(),
            "History saved"
        );
        Ok(())
    }

    async fn load(&self) -> Result<ChatHistory, PersistenceError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => decode(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ChatHistory::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> Result<(), PersistenceError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "History removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ChatMessage, Sender};

    fn sample(n: usize) -> ChatHistory {
        (0..n)
            .map(|i| {
                let sender = if i % 2 == 0 { Sender::User } else { Sender::Bot };
                ChatMessage::now(sender, format!("message {i}"))
            })
            .collect::<Vec<_>>()
            .into()
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "chatHistory");

        let history = store.load().await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"), "chatHistory");
        let history = sample(5);

        store.save(&history).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, history);
        assert!(store.path().ends_with("nested/chatHistory.json"));
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "chatHistory");

        store.save(&sample(4)).await.unwrap();
        store.save(&sample(1)).await.unwrap();

        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "chatHistory");

        store.save(&sample(2)).await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();

        assert!(!store.path().exists());
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "chatHistory");
        std::fs::write(store.path(), "{not json").unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt(_)));
    }
}
