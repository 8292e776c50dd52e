//! Chat session state and turn orchestration.
//!
//! This module owns the conversation: the ordered transcript, the input
//! draft and the loading/error flags. Every change to the transcript is
//! mirrored to a [`crate::persistence::HistoryStore`].
//!
//! # Architecture
//!
//! - [`ChatMessage`], [`ChatHistory`]: the transcript data model
//! - [`ChatSession`]: the controller running one turn per user message
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use heya::persistence::MemoryStore;
//! use heya::session::ChatSession;
//!
//! let session = ChatSession::open(Arc::new(MemoryStore::new()), client, None).await;
//! session.send_message(Some("Hello".to_string())).await;
//!
//! let history = session.history().await;
//! assert_eq!(history.len(), 2);
//! ```

mod controller;
mod message;

pub use controller::{
    ChatSession, EMPTY_RESPONSE_PLACEHOLDER, PendingTurn, REQUEST_FAILED_MESSAGE, SendOutcome,
    SessionBusy, SessionSnapshot,
};
pub use message::{ChatHistory, ChatMessage, Sender};
