//! In-memory backend double for service tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::client::ModerationBackend;
use crate::models::{
    CreateEventRequest, Event, EventStatus, Id, Language, Question, QuestionStatus,
};
use crate::utils::error::ModerationError;

pub(crate) fn event(id: u64, code: &str) -> Event {
    Event {
        id: Id::from(id),
        code: code.to_string(),
        title: format!("Event {}", code),
        description: None,
        organizer_name: "Jo".to_string(),
        organizer_email: "jo@x.com".to_string(),
        language: Language::En,
        max_participants: 100,
        status: EventStatus::Active,
        created_at: None,
    }
}

pub(crate) fn question(id: u64, event_id: u64, status: QuestionStatus) -> Question {
    Question {
        id: Id::from(id),
        event_id: Id::from(event_id),
        participant_name: "Sam".to_string(),
        participant_email: Some("sam@x.com".to_string()),
        question_text: format!("Question {}?", id),
        status,
        created_at: None,
    }
}

/// Holds gated backend calls until released.
pub(crate) struct Gate(watch::Sender<bool>);

impl Gate {
    pub(crate) fn release(&self) {
        let _ = self.0.send(true);
    }
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    questions: Vec<Question>,
    next_id: u64,
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    state: Mutex<State>,
    fail_reads: AtomicBool,
    fail_updates: AtomicBool,
    question_gate: Mutex<Option<watch::Receiver<bool>>>,
    update_gate: Mutex<Option<watch::Receiver<bool>>>,
    event_list_calls: AtomicUsize,
    question_list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
}

impl FakeBackend {
    pub(crate) fn seed_event(&self, event: Event) {
        self.state.lock().unwrap().events.push(event);
    }

    pub(crate) fn seed_question(&self, question: Question) {
        let mut state = self.state.lock().unwrap();
        state.questions.retain(|q| q.id != question.id);
        state.questions.push(question);
    }

    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn hold_question_reads(&self) -> Gate {
        let (tx, rx) = watch::channel(false);
        *self.question_gate.lock().unwrap() = Some(rx);
        Gate(tx)
    }

    pub(crate) fn hold_updates(&self) -> Gate {
        let (tx, rx) = watch::channel(false);
        *self.update_gate.lock().unwrap() = Some(rx);
        Gate(tx)
    }

    pub(crate) fn event_list_calls(&self) -> usize {
        self.event_list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn question_list_calls(&self) -> usize {
        self.question_list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub(crate) async fn wait_for_question_reads(&self, at_least: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.question_list_calls() < at_least {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("question reads did not arrive");
    }
}

#[async_trait]
impl ModerationBackend for FakeBackend {
    async fn list_events(&self) -> Result<Vec<Event>, ModerationError> {
        self.event_list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ModerationError::Transport("GET /events returned 503".to_string()));
        }
        Ok(self.state.lock().unwrap().events.clone())
    }

    async fn create_event(&self, request: &CreateEventRequest) -> Result<Event, ModerationError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if state.events.iter().any(|e| e.code == request.code) {
            return Err(ModerationError::Conflict("Event code already exists".to_string()));
        }

        state.next_id += 1;
        let event = Event {
            id: Id::from(1_000 + state.next_id),
            code: request.code.clone(),
            title: request.title.clone(),
            description: request.description.clone(),
            organizer_name: request.organizer_name.clone(),
            organizer_email: request.organizer_email.clone(),
            language: request.language,
            max_participants: request.max_participants,
            status: EventStatus::Active,
            created_at: None,
        };
        state.events.push(event.clone());
        Ok(event)
    }

    async fn list_questions(&self, event_id: &Id) -> Result<Vec<Question>, ModerationError> {
        self.question_list_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.question_gate.lock().unwrap().clone();
        if let Some(mut gate) = gate {
            let _ = gate.wait_for(|open| *open).await;
        }

        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ModerationError::Transport("GET /questions returned 503".to_string()));
        }
        Ok(self
            .state
            .lock()
            .unwrap()
            .questions
            .iter()
            .filter(|q| &q.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn update_question_status(
        &self,
        question_id: &Id,
        status: QuestionStatus,
    ) -> Result<Question, ModerationError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.update_gate.lock().unwrap().clone();
        if let Some(mut gate) = gate {
            let _ = gate.wait_for(|open| *open).await;
        }

        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(ModerationError::Transport("Failed to update question".to_string()));
        }

        let mut state = self.state.lock().unwrap();
        let question = state
            .questions
            .iter_mut()
            .find(|q| &q.id == question_id)
            .ok_or_else(|| ModerationError::NotFound(format!("Question {} no longer exists", question_id)))?;
        question.status = status;
        Ok(question.clone())
    }
}
