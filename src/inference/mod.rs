//! Client for the question/answer inference endpoint.
//!
//! The endpoint is an opaque HTTP service: one `POST` with
//! `{"question": "..."}` in, `{"response": "..."}` out. The
//! [`InferenceClient`] trait is the seam the session controller talks to;
//! [`HttpInferenceClient`] is the real implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use heya::inference::{HttpInferenceClient, InferenceClient, InferenceSettings};
//!
//! let client = HttpInferenceClient::new(InferenceSettings {
//!     endpoint: "http://localhost:8000/ask".to_string(),
//! });
//! let answer = client.ask("What's the weather today?").await?;
//! ```

mod http;

pub use http::HttpInferenceClient;

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// Inference endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceSettings {
    /// Full URL the questions are posted to.
    pub endpoint: String,
}

/// Request body sent to the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBody {
    pub question: String,
}

/// Response body returned by the endpoint.
///
/// `response` is optional on the wire; a missing or non-string field is
/// treated as an empty answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerBody {
    #[serde(default, deserialize_with = "lenient_string")]
    pub response: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

/// Trait for anything that can answer a question.
#[async_trait::async_trait]
pub trait InferenceClient: Send + Sync + std::fmt::Debug {
    /// Ask a single question and return the answer text (possibly empty).
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the transport fails, the status is not
    /// successful or the body is not JSON. No retries are attempted.
    async fn ask(&self, question: &str) -> Result<String, RequestError>;
}
