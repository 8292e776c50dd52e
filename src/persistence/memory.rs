//! In-process history store.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{HistoryStore, decode, encode};
use crate::error::PersistenceError;
use crate::session::ChatHistory;

/// Keeps the serialized transcript in memory.
///
/// Holds the encoded string rather than the value so it behaves like the
/// durable stores: saves are snapshots and corrupt data can be planted with
/// [`MemoryStore::with_raw`]. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<RwLock<Option<String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `raw` as its stored value.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(raw.into()))),
        }
    }

    /// The stored value, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slot.read().unwrap().clone()
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn save(&self, history: &ChatHistory) -> Result<(), PersistenceError> {
        let data = encode(history)?;
        *self.slot.write().unwrap() = Some(data);
        Ok(())
    }

    async fn load(&self) -> Result<ChatHistory, PersistenceError> {
        match self.raw() {
            Some(raw) => decode(&raw),
            None => Ok(ChatHistory::new()),
        }
    }

    async fn clear(&self) -> Result<(), PersistenceError> {
        *self.slot.write().unwrap() = None;
        Ok(())
    }
}
