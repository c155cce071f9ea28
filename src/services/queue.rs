use std::sync::Arc;

use tracing::{debug, info, warn};

use super::cache::QueryCache;
use super::session::{SelectionScope, SessionContext};
use crate::client::ModerationBackend;
use crate::models::{Id, Question, QuestionStatus};
use crate::utils::error::ModerationError;

/// Per-event question replicas plus the moderation transition.
pub struct QuestionQueue {
    backend: Arc<dyn ModerationBackend>,
    cache: QueryCache<Id, Vec<Question>>,
}

impl QuestionQueue {
    pub fn new(backend: Arc<dyn ModerationBackend>) -> Self {
        Self {
            backend,
            cache: QueryCache::new(),
        }
    }

    /// Questions of `event_id`, fetched from the backend. No event selected is
    /// a no-op, and transport failures degrade to an empty list.
    pub async fn list_questions(&self, event_id: Option<&Id>) -> Vec<Question> {
        let Some(event_id) = event_id else {
            return Vec::new();
        };

        let questions = self.fetch(event_id).await;
        self.cache.store(event_id.clone(), questions.clone());
        questions
    }

    /// Fetches for a selection scope and stores the result only if the
    /// selection has not moved on. Returns `None` for a superseded scope.
    pub async fn refresh_scope(
        &self,
        scope: &SelectionScope,
        session: &SessionContext,
    ) -> Option<Vec<Question>> {
        let questions = self.fetch(&scope.event_id).await;

        if !session.is_current(scope) {
            debug!(
                event_id = %scope.event_id,
                generation = scope.generation,
                "Discarding questions for superseded selection"
            );
            return None;
        }

        self.cache.store(scope.event_id.clone(), questions.clone());
        Some(questions)
    }

    async fn fetch(&self, event_id: &Id) -> Vec<Question> {
        match self.backend.list_questions(event_id).await {
            Ok(questions) => questions,
            Err(e) => {
                warn!(event_id = %event_id, code = e.code(), error = %e, "Question list unavailable, showing none");
                Vec::new()
            }
        }
    }

    pub fn cached_questions(&self, event_id: &Id) -> Vec<Question> {
        self.cache.snapshot(event_id).unwrap_or_default()
    }

    /// Applies a moderation decision.
    ///
    /// Any of the four statuses may follow any other; only re-applying the
    /// current status is refused, and that happens before any request.
    pub async fn set_status(
        &self,
        question: &Question,
        new_status: QuestionStatus,
    ) -> Result<Question, ModerationError> {
        if question.status == new_status {
            return Err(ModerationError::NoOpTransition(new_status));
        }

        let updated = self
            .backend
            .update_question_status(&question.id, new_status)
            .await?;

        info!(
            question_id = %question.id,
            event_id = %question.event_id,
            from = %question.status,
            to = %new_status,
            "Question status updated"
        );
        self.cache.invalidate(&question.event_id);
        Ok(updated)
    }

    /// Statuses `question` may move to.
    pub fn allowed_transitions(question: &Question) -> Vec<QuestionStatus> {
        QuestionStatus::ALL
            .into_iter()
            .filter(|s| *s != question.status)
            .collect()
    }

    pub fn is_stale(&self, event_id: &Id) -> bool {
        self.cache.is_stale(event_id)
    }

    pub(crate) fn invalidation_signal(&self) -> Arc<tokio::sync::Notify> {
        self.cache.invalidation_signal()
    }
}
