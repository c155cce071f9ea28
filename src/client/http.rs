use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::ModerationBackend;
use crate::models::{CreateEventRequest, Event, Id, Question, QuestionStatus, StatusUpdate};
use crate::utils::error::ModerationError;
use crate::utils::response::backend_error_message;

const CREATE_EVENT_FAILED: &str = "Failed to create event";
const UPDATE_QUESTION_FAILED: &str = "Failed to update question";

/// JSON-over-HTTP backend client.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ModerationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(
        resp: reqwest::Response,
        what: &str,
    ) -> Result<T, ModerationError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(ModerationError::Transport(format!(
                "{} returned {}",
                what,
                status.as_u16()
            )));
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ModerationBackend for HttpBackend {
    async fn list_events(&self) -> Result<Vec<Event>, ModerationError> {
        let resp = self.client.get(self.url("/events")).send().await?;
        Self::read_json(resp, "GET /events").await
    }

    async fn create_event(&self, request: &CreateEventRequest) -> Result<Event, ModerationError> {
        let resp = self
            .client
            .post(self.url("/events"))
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = backend_error_message(&body, CREATE_EVENT_FAILED);
            return Err(match status {
                StatusCode::CONFLICT => ModerationError::Conflict(message),
                StatusCode::NOT_FOUND => ModerationError::NotFound(message),
                _ => ModerationError::Rejected {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn list_questions(&self, event_id: &Id) -> Result<Vec<Question>, ModerationError> {
        let resp = self
            .client
            .get(self.url("/questions"))
            .query(&[("eventId", event_id.as_str())])
            .send()
            .await?;
        Self::read_json(resp, "GET /questions").await
    }

    async fn update_question_status(
        &self,
        question_id: &Id,
        status: QuestionStatus,
    ) -> Result<Question, ModerationError> {
        let path = format!("/questions/{}", urlencoding::encode(question_id.as_str()));
        let resp = self
            .client
            .put(self.url(&path))
            .json(&StatusUpdate { status })
            .send()
            .await?;

        let code = resp.status();
        if code == StatusCode::NOT_FOUND {
            return Err(ModerationError::NotFound(format!(
                "Question {} no longer exists",
                question_id
            )));
        }
        if !code.is_success() {
            tracing::debug!(question_id = %question_id, status = code.as_u16(), "Status update rejected");
            return Err(ModerationError::Transport(UPDATE_QUESTION_FAILED.to_string()));
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
