//! `reqwest`-backed inference client.

use super::{AnswerBody, InferenceClient, InferenceSettings, QuestionBody};
use crate::error::RequestError;

/// Posts questions to the configured endpoint.
#[derive(Clone)]
pub struct HttpInferenceClient {
    http: reqwest::Client,
    settings: InferenceSettings,
}

impl std::fmt::Debug for HttpInferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpInferenceClient")
            .field("settings", &self.settings)
            .finish()
    }
}

impl HttpInferenceClient {
    /// Create a client with a default `reqwest` client.
    #[must_use]
    pub fn new(settings: InferenceSettings) -> Self {
        Self::with_client(settings, reqwest::Client::new())
    }

    /// Create a client around an existing `reqwest` client.
    #[must_use]
    pub fn with_client(settings: InferenceSettings, http: reqwest::Client) -> Self {
        Self { http, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &InferenceSettings {
        &self.settings
    }
}

#[async_trait::async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn ask(&self, question: &str) -> Result<String, RequestError> {
        let body = QuestionBody {
            question: question.to_string(),
        };

        tracing::debug!(
            endpoint = %self.settings.endpoint,
            question_length = question.len(),
            "Posting question"
        );

        let resp = self
            .http
            .post(&self.settings.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(RequestError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(
                endpoint = %self.settings.endpoint,
                status = %status,
                "Inference endpoint returned error status"
            );
            return Err(RequestError::Status {
                status: status.as_u16(),
            });
        }

        let answer: AnswerBody = resp.json().await.map_err(RequestError::Decode)?;

        tracing::debug!(
            answer_length = answer.response.len(),
            "Received answer"
        );
        Ok(answer.response)
    }
}
