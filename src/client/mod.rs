//! Transport seam between the moderation core and the backend that owns
//! events and questions.

use async_trait::async_trait;

pub mod http;

pub use http::HttpBackend;

use crate::models::{CreateEventRequest, Event, Id, Question, QuestionStatus};
use crate::utils::error::ModerationError;

/// Backend REST surface consumed by the moderation core.
///
/// Implementations report every failure; the directory and queue clients
/// decide which failures degrade silently.
#[async_trait]
pub trait ModerationBackend: Send + Sync {
    async fn list_events(&self) -> Result<Vec<Event>, ModerationError>;

    async fn create_event(&self, request: &CreateEventRequest) -> Result<Event, ModerationError>;

    async fn list_questions(&self, event_id: &Id) -> Result<Vec<Question>, ModerationError>;

    async fn update_question_status(
        &self,
        question_id: &Id,
        status: QuestionStatus,
    ) -> Result<Question, ModerationError>;
}
