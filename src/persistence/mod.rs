//! History persistence adapters.
//!
//! The session controller depends on the [`HistoryStore`] capability rather
//! than on a concrete storage API. Every implementation keeps the whole
//! transcript under a single key and overwrites it wholesale on save.
//!
//! - [`FileStore`]: one JSON file per key inside a directory
//! - [`MemoryStore`]: in-process value, used by tests and the `memory` backend

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::PersistenceError;
use crate::session::ChatHistory;

/// Key the transcript is stored under unless configured otherwise.
pub const DEFAULT_HISTORY_KEY: &str = "chatHistory";

/// Whole-list storage for a chat transcript.
#[async_trait]
pub trait HistoryStore: Send + Sync + std::fmt::Debug {
    /// Overwrite the stored transcript with `history`.
    async fn save(&self, history: &ChatHistory) -> Result<(), PersistenceError>;

    /// Read the stored transcript; empty when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Corrupt`] when a value exists but cannot
    /// be decoded.
    async fn load(&self) -> Result<ChatHistory, PersistenceError>;

    /// Remove the stored transcript. Removing an absent key succeeds.
    async fn clear(&self) -> Result<(), PersistenceError>;
}

pub(crate) fn encode(history: &ChatHistory) -> Result<String, PersistenceError> {
    serde_json::to_string(history).map_err(PersistenceError::Serialize)
}

pub(crate) fn decode(raw: &str) -> Result<ChatHistory, PersistenceError> {
    serde_json::from_str(raw).map_err(PersistenceError::Corrupt)
}
