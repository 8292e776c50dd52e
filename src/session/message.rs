//! Chat message and transcript types.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing into the chat view.
    User,
    /// The inference endpoint.
    Bot,
}

impl Sender {
    /// Label used in exported transcripts.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Bot => "Bot",
        }
    }
}

/// A single entry of the transcript.
///
/// Messages are immutable once created: the history only ever grows by
/// appending new ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message.
    pub sender: Sender,
    /// Message body (markdown allowed).
    pub content: String,
    /// Local wall-clock time, `HH:MM`.
    pub timestamp: String,
}

impl ChatMessage {
    /// Create a message stamped with the current local time.
    #[must_use]
    pub fn now(sender: Sender, content: impl Into<String>) -> Self {
        Self::at(sender, content, Local::now())
    }

    /// Create a message stamped with the given time.
    #[must_use]
    pub fn at(sender: Sender, content: impl Into<String>, time: DateTime<Local>) -> Self {
        Self {
            sender,
            content: content.into(),
            timestamp: time.format("%H:%M").to_string(),
        }
    }

    /// Shorthand for a user message stamped now.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::now(Sender::User, content)
    }

    /// Shorthand for a bot message stamped now.
    #[must_use]
    pub fn bot(content: impl Into<String>) -> Self {
        Self::now(Sender::Bot, content)
    }
}

/// Ordered transcript of a session.
///
/// Serializes as a bare JSON array, which is also the persisted format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message at the end.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Messages in display order.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Iterate in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl From<Vec<ChatMessage>> for ChatHistory {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}

impl<'a> IntoIterator for &'a ChatHistory {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_is_hour_minute() {
        let time = Local.with_ymd_and_hms(2025, 3, 4, 9, 5, 59).unwrap();
        let msg = ChatMessage::at(Sender::User, "Hello", time);
        assert_eq!(msg.timestamp, "09:05");
    }

    #[test]
    fn test_history_serializes_as_array() {
        let time = Local.with_ymd_and_hms(2025, 3, 4, 14, 30, 0).unwrap();
        let history = ChatHistory::from(vec![
            ChatMessage::at(Sender::User, "Hello", time),
            ChatMessage::at(Sender::Bot, "Hi there", time),
        ]);

        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"sender": "user", "content": "Hello", "timestamp": "14:30"},
                {"sender": "bot", "content": "Hi there", "timestamp": "14:30"},
            ])
        );
    }

    #[test]
    fn test_history_reads_stored_format() {
        let stored = r#"[{"sender":"bot","content":"x","timestamp":"08:00"}]"#;
        let history: ChatHistory = serde_json::from_str(stored).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.messages()[0].sender, Sender::Bot);
    }
}
