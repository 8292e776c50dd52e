//! Error types for the chat core.

use thiserror::Error;

/// Failure of a single inference round trip.
#[derive(Error, Debug)]
pub enum RequestError {
    /// The request never produced a response (DNS, connect, reset, ...).
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body was not valid JSON.
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Failure of the history persistence adapter.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Reading or writing the backing storage failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored value could not be deserialized.
    #[error("stored history is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// The history could not be serialized.
    #[error("failed to serialize history: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Failure while producing the PDF transcript.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The PDF writer rejected the document.
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Serializing the document into memory failed.
    #[error("PDF write failed: {0}")]
    Write(#[from] std::io::Error),
}
