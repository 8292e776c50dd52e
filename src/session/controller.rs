//! The chat session controller.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::message::{ChatHistory, ChatMessage, Sender};
use crate::inference::InferenceClient;
use crate::persistence::HistoryStore;

/// Bot message used when the endpoint answers with an empty response.
pub const EMPTY_RESPONSE_PLACEHOLDER: &str = "No response received.";

/// User-facing error shown when a turn fails.
pub const REQUEST_FAILED_MESSAGE: &str = "Something went wrong. Please try again.";

/// Result of a [`ChatSession::send_message`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The text was blank; nothing happened.
    Ignored,
    /// The endpoint answered and this bot message was appended.
    Answered(ChatMessage),
    /// The request failed; the session error flag holds this message.
    Failed(String),
    /// The history was cleared while the turn was in flight, so its
    /// outcome was dropped.
    Discarded,
}

/// Read-only copy of the session state, used for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SessionSnapshot {
    pub messages: ChatHistory,
    pub loading: bool,
    pub error: Option<String>,
    pub input: String,
}

/// Returned by [`ChatSession::try_begin_turn`] while a turn is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a turn is already in flight")]
pub struct SessionBusy;

/// A turn whose user message is recorded but whose answer is still owed.
#[derive(Debug)]
#[must_use = "the turn stays loading until finished"]
pub struct PendingTurn {
    session: ChatSession,
    question: String,
    generation: u64,
}

impl PendingTurn {
    /// The trimmed question that was recorded.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Ask the endpoint and record the outcome.
    pub async fn finish(self) -> SendOutcome {
        self.session.complete(&self.question, self.generation).await
    }
}

#[derive(Debug, Default)]
struct SessionState {
    history: ChatHistory,
    input: String,
    loading: bool,
    error: Option<String>,
    /// Bumped by every clear; a turn only lands in the history it started in.
    generation: u64,
}

/// A single chat session.
///
/// Owns the transcript, the input draft and the loading/error flags, and
/// mirrors the transcript to its [`HistoryStore`] after every change.
/// Cloning yields another handle to the same session.
///
/// The controller does not queue turns. Callers are expected to refuse a
/// new submission while [`ChatSession::is_loading`] is true.
#[derive(Debug, Clone)]
pub struct ChatSession {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    state: RwLock<SessionState>,
    store: Arc<dyn HistoryStore>,
    client: Arc<dyn InferenceClient>,
}

impl ChatSession {
    /// Create an empty session. Nothing is read from the store until
    /// [`ChatSession::mount`] is called.
    #[must_use]
    pub fn new(store: Arc<dyn HistoryStore>, client: Arc<dyn InferenceClient>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(SessionState::default()),
                store,
                client,
            }),
        }
    }

    /// Create a session, restore its history and submit `initial` as the
    /// first turn if given.
    pub async fn open(
        store: Arc<dyn HistoryStore>,
        client: Arc<dyn InferenceClient>,
        initial: Option<String>,
    ) -> Self {
        let session = Self::new(store, client);
        session.mount(initial).await;
        session
    }

    /// Restore the history from the store, then submit `initial` once.
    ///
    /// A store that cannot be read leaves the session with an empty history.
    pub async fn mount(&self, initial: Option<String>) -> Option<SendOutcome> {
        let restored = match self.inner.store.load().await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(
                    name: "session.restore.failed",
                    error = %e,
                    "Stored history unreadable, starting empty"
                );
                ChatHistory::new()
            }
        };

        tracing::info!(
            name: "session.restored",
            message_count = restored.len(),
            "Session mounted"
        );

        self.inner.state.write().await.history = restored;

        match initial {
            Some(text) => Some(self.send_message(Some(text)).await),
            None => None,
        }
    }

    /// Run one turn.
    ///
    /// Uses `text` if given, otherwise the current draft. Blank input is
    /// ignored. The user message is appended and persisted before the
    /// endpoint is contacted; `loading` is cleared however the turn ends.
    pub async fn send_message(&self, text: Option<String>) -> SendOutcome {
        match self.begin(text, false).await {
            Ok(Some(turn)) => turn.finish().await,
            Ok(None) | Err(SessionBusy) => SendOutcome::Ignored,
        }
    }

    /// Start a turn unless one is already in flight.
    ///
    /// On success the user message is already in the history and `loading`
    /// is set; the returned [`PendingTurn`] asks the endpoint when awaited.
    /// `Ok(None)` means the text was blank.
    pub async fn try_begin_turn(
        &self,
        text: Option<String>,
    ) -> Result<Option<PendingTurn>, SessionBusy> {
        self.begin(text, true).await
    }

    async fn begin(
        &self,
        text: Option<String>,
        refuse_when_loading: bool,
    ) -> Result<Option<PendingTurn>, SessionBusy> {
        let mut state = self.inner.state.write().await;
        if refuse_when_loading && state.loading {
            return Err(SessionBusy);
        }

        let raw = match text {
            Some(t) => t,
            None => state.input.clone(),
        };
        let question = raw.trim().to_string();
        if question.is_empty() {
            return Ok(None);
        }

        state.history.push(ChatMessage::now(Sender::User, question.clone()));
        state.input.clear();
        state.loading = true;
        state.error = None;
        self.persist(&state.history).await;

        Ok(Some(PendingTurn {
            session: self.clone(),
            question,
            generation: state.generation,
        }))
    }

    async fn complete(&self, question: &str, generation: u64) -> SendOutcome {
        tracing::info!(
            name: "session.turn.started",
            question_length = question.len(),
            "Asking inference endpoint"
        );

        let result = self.inner.client.ask(question).await;

        let mut state = self.inner.state.write().await;
        if state.generation != generation {
            tracing::info!(
                name: "session.turn.discarded",
                "History cleared during turn, outcome dropped"
            );
            state.loading = false;
            return SendOutcome::Discarded;
        }

        let outcome = match result {
            Ok(answer) => {
                let content = if answer.is_empty() {
                    EMPTY_RESPONSE_PLACEHOLDER.to_string()
                } else {
                    answer
                };
                let message = ChatMessage::now(Sender::Bot, content);
                state.history.push(message.clone());
                self.persist(&state.history).await;
                tracing::info!(
                    name: "session.turn.answered",
                    answer_length = message.content.len(),
                    message_count = state.history.len(),
                    "Turn complete"
                );
                SendOutcome::Answered(message)
            }
            Err(e) => {
                tracing::error!(
                    name: "session.turn.failed",
                    error = %e,
                    "Inference request failed"
                );
                state.error = Some(REQUEST_FAILED_MESSAGE.to_string());
                SendOutcome::Failed(REQUEST_FAILED_MESSAGE.to_string())
            }
        };
        state.loading = false;
        outcome
    }

    /// Empty the history and remove the stored copy.
    pub async fn clear(&self) {
        let mut state = self.inner.state.write().await;
        state.history.clear();
        state.generation += 1;
        if let Err(e) = self.inner.store.clear().await {
            tracing::error!(
                name: "session.clear.failed",
                error = %e,
                "Failed to remove stored history"
            );
        }
        tracing::info!(name: "session.cleared", "Chat history cleared");
    }

    /// Replace the input draft.
    pub async fn set_input(&self, text: impl Into<String>) {
        self.inner.state.write().await.input = text.into();
    }

    /// Current input draft.
    pub async fn input(&self) -> String {
        self.inner.state.read().await.input.clone()
    }

    /// Whether a turn is in flight.
    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.loading
    }

    /// Copy of the current history.
    pub async fn history(&self) -> ChatHistory {
        self.inner.state.read().await.history.clone()
    }

    /// Copy of the whole session state.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.state.read().await;
        SessionSnapshot {
            messages: state.history.clone(),
            loading: state.loading,
            error: state.error.clone(),
            input: state.input.clone(),
        }
    }

    async fn persist(&self, history: &ChatHistory) {
        if let Err(e) = self.inner.store.save(history).await {
            tracing::error!(
                name: "session.persist.failed",
                error = %e,
                message_count = history.len(),
                "Failed to persist history"
            );
        }
    }
}
