//! Organizer session: event selection, polling lifecycle, and moderation
//! actions.
//!
//! ```text
//! ModerationController
//!     │
//!     ├─► events poller (always on) ──► EventDirectory::refresh
//!     ├─► questions poller (per selection) ──► QuestionQueue::refresh_scope
//!     └─► approve / decline / mark_answered ──► QuestionQueue::set_status
//!                                                  └─► invalidate ──► wake poller
//! ```
//!
//! Nothing here writes fetched data directly; displays read the replicas the
//! pollers keep up to date.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::directory::EventDirectory;
use super::poller::spawn_poller;
use super::queue::QuestionQueue;
use super::session::{SelectionScope, SessionContext};
use crate::client::ModerationBackend;
use crate::config::Config;
use crate::models::{Event, EventDraft, Question, QuestionStatus};
use crate::utils::error::ModerationError;
use crate::utils::join_link::{derive_join_link, JoinLink};

/// Organizer intent on a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Decline,
    MarkAnswered,
}

impl ModerationAction {
    pub const ALL: [ModerationAction; 3] = [
        ModerationAction::Approve,
        ModerationAction::Decline,
        ModerationAction::MarkAnswered,
    ];

    pub fn target_status(self) -> QuestionStatus {
        match self {
            ModerationAction::Approve => QuestionStatus::Approved,
            ModerationAction::Decline => QuestionStatus::Declined,
            ModerationAction::MarkAnswered => QuestionStatus::Answered,
        }
    }

    /// Enabled actions for `question`: those that would change its status.
    pub fn available_for(question: &Question) -> Vec<ModerationAction> {
        Self::ALL
            .into_iter()
            .filter(|a| a.target_status() != question.status)
            .collect()
    }
}

struct ScopedTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct ModerationController {
    session_id: Uuid,
    config: Config,
    directory: Arc<EventDirectory>,
    queue: Arc<QuestionQueue>,
    session: Arc<SessionContext>,
    teardown: CancellationToken,
    events_task: Mutex<Option<JoinHandle<()>>>,
    questions_task: Mutex<Option<ScopedTask>>,
}

impl ModerationController {
    pub fn new(backend: Arc<dyn ModerationBackend>, config: Config) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            directory: Arc::new(EventDirectory::new(Arc::clone(&backend), Duration::ZERO)),
            queue: Arc::new(QuestionQueue::new(backend)),
            session: Arc::new(SessionContext::new()),
            teardown: CancellationToken::new(),
            events_task: Mutex::new(None),
            questions_task: Mutex::new(None),
            config,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn directory(&self) -> &EventDirectory {
        &self.directory
    }

    pub fn queue(&self) -> &QuestionQueue {
        &self.queue
    }

    /// Starts the event list poller. Must be called within a tokio runtime.
    pub fn start(&self) {
        let mut slot = self.events_task.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return;
        }

        info!(session_id = %self.session_id, "Starting moderation session");
        let directory = Arc::clone(&self.directory);
        let handle = spawn_poller(
            "events",
            self.config.polling.events,
            self.teardown.child_token(),
            self.directory.invalidation_signal(),
            move || {
                let directory = Arc::clone(&directory);
                async move {
                    directory.refresh().await;
                }
            },
        );
        *slot = Some(handle);
    }

    /// Switches the moderated event. Polling for the previous event stops
    /// before polling for the new one starts.
    pub fn select_event(&self, event: Option<Event>) -> Option<SelectionScope> {
        let mut slot = self.questions_task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = slot.take() {
            previous.token.cancel();
            previous.handle.abort();
        }

        let scope = self.session.select(event);
        match &scope {
            Some(scope) => {
                info!(session_id = %self.session_id, event_id = %scope.event_id, "Event selected");
                *slot = Some(self.spawn_question_poller(scope.clone()));
            }
            None => info!(session_id = %self.session_id, "Selection cleared"),
        }
        scope
    }

    fn spawn_question_poller(&self, scope: SelectionScope) -> ScopedTask {
        let token = self.teardown.child_token();
        let queue = Arc::clone(&self.queue);
        let session = Arc::clone(&self.session);
        let handle = spawn_poller(
            "questions",
            self.config.polling.questions,
            token.clone(),
            self.queue.invalidation_signal(),
            move || {
                let queue = Arc::clone(&queue);
                let session = Arc::clone(&session);
                let scope = scope.clone();
                async move {
                    queue.refresh_scope(&scope, &session).await;
                }
            },
        );
        ScopedTask { token, handle }
    }

    pub fn selected_event(&self) -> Option<Event> {
        self.session.selected_event()
    }

    pub fn events(&self) -> Vec<Event> {
        self.directory.cached_events()
    }

    /// Questions of the selected event as last fetched. Empty when nothing
    /// is selected.
    pub fn questions(&self) -> Vec<Question> {
        match self.session.current_scope() {
            Some(scope) => self.queue.cached_questions(&scope.event_id),
            None => Vec::new(),
        }
    }

    /// Fetches the selected event's questions now instead of waiting for the
    /// next tick. Empty once the session is torn down.
    pub async fn refresh_questions(&self) -> Vec<Question> {
        let Some(scope) = self.session.current_scope() else {
            return Vec::new();
        };
        let fetch = async {
            let questions = self.queue.refresh_scope(&scope, &self.session).await;
            Ok::<_, ModerationError>(questions)
        };
        self.until_teardown(fetch)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// Runs `operation` unless the session is torn down first, in which case
    /// it is dropped mid-flight and nothing it would have done afterwards
    /// happens.
    async fn until_teardown<T>(
        &self,
        operation: impl Future<Output = Result<T, ModerationError>>,
    ) -> Result<T, ModerationError> {
        tokio::select! {
            biased;
            _ = self.teardown.cancelled() => Err(ModerationError::Cancelled),
            result = operation => result,
        }
    }

    pub fn find_question(&self, id: &str) -> Option<Question> {
        self.questions().into_iter().find(|q| q.id.as_str() == id)
    }

    pub async fn create_event(&self, draft: &EventDraft) -> Result<Event, ModerationError> {
        let create = self
            .directory
            .create_event(draft)
            .instrument(info_span!("create_event", session_id = %self.session_id));
        self.until_teardown(create).await
    }

    /// Applies `action` to `question`. On failure the displayed status is left
    /// as it was; the next poll is the recovery path.
    pub async fn apply(
        &self,
        question: &Question,
        action: ModerationAction,
    ) -> Result<Question, ModerationError> {
        let update = self
            .queue
            .set_status(question, action.target_status())
            .instrument(info_span!("moderate", session_id = %self.session_id, ?action));
        self.until_teardown(update).await.inspect_err(|e| {
            warn!(question_id = %question.id, code = e.code(), error = %e, "Moderation failed");
        })
    }

    pub async fn approve(&self, question: &Question) -> Result<Question, ModerationError> {
        self.apply(question, ModerationAction::Approve).await
    }

    pub async fn decline(&self, question: &Question) -> Result<Question, ModerationError> {
        self.apply(question, ModerationAction::Decline).await
    }

    pub async fn mark_answered(&self, question: &Question) -> Result<Question, ModerationError> {
        self.apply(question, ModerationAction::MarkAnswered).await
    }

    pub fn join_link(&self, event: &Event) -> JoinLink {
        derive_join_link(&event.code, &self.config.join_origin, &self.config.qr)
    }

    /// Stops every poller and waits for them to exit. Operations still in
    /// flight are abandoned.
    pub async fn shutdown(&self) {
        self.teardown.cancel();

        let events = self.events_task.lock().unwrap_or_else(|e| e.into_inner()).take();
        let questions = self
            .questions_task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        if let Some(handle) = events {
            let _ = handle.await;
        }
        if let Some(task) = questions {
            let _ = task.handle.await;
        }
        info!(session_id = %self.session_id, "Moderation session stopped");
    }
}

impl Drop for ModerationController {
    fn drop(&mut self) {
        self.teardown.cancel();
    }
}
