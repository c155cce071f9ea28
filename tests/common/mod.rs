//! In-process backend for integration tests.
//!
//! Serves the REST surface the moderation core consumes from an in-memory
//! store on an ephemeral port, and records how often each route was hit.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use qa_moderator::models::{
    CreateEventRequest, Event, EventStatus, Id, Question, QuestionStatus, StatusUpdate,
};
use qa_moderator::HttpBackend;

#[derive(Default)]
pub struct BackendState {
    pub events: Vec<Event>,
    pub questions: Vec<Question>,
    pub next_id: u64,
    pub fail_reads: bool,
    pub hits: HashMap<&'static str, usize>,
}

impl BackendState {
    fn hit(&mut self, route: &'static str) {
        *self.hits.entry(route).or_default() += 1;
    }
}

type Shared = Arc<Mutex<BackendState>>;

pub struct FakeBackendServer {
    pub addr: SocketAddr,
    pub state: Shared,
}

impl FakeBackendServer {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState::default()));

        let app = Router::new()
            .route("/events", get(list_events).post(create_event))
            .route("/questions", get(list_questions))
            .route("/questions/:id", put(update_question))
            .layer(TraceLayer::new_for_http())
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn http_backend(&self) -> HttpBackend {
        HttpBackend::new(self.base_url(), Duration::from_secs(5)).unwrap()
    }

    pub fn hits(&self, route: &str) -> usize {
        self.state.lock().unwrap().hits.get(route).copied().unwrap_or(0)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    /// Adds a pending question to `event_id`, as the participant flow would.
    pub fn submit_question(&self, id: u64, event_id: &Id, text: &str) -> Question {
        let question = Question {
            id: Id::from(id),
            event_id: event_id.clone(),
            participant_name: "Sam".to_string(),
            participant_email: Some("sam@x.com".to_string()),
            question_text: text.to_string(),
            status: QuestionStatus::Pending,
            created_at: None,
        };
        self.state.lock().unwrap().questions.push(question.clone());
        question
    }

    pub fn delete_question(&self, id: &Id) {
        self.state.lock().unwrap().questions.retain(|q| &q.id != id);
    }
}

async fn list_events(State(state): State<Shared>) -> Response {
    let mut state = state.lock().unwrap();
    state.hit("GET /events");
    if state.fail_reads {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    Json(state.events.clone()).into_response()
}

async fn create_event(
    State(state): State<Shared>,
    Json(request): Json<CreateEventRequest>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.hit("POST /events");

    if state.events.iter().any(|e| e.code == request.code) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "Event code already exists" })),
        )
            .into_response();
    }

    state.next_id += 1;
    let event = Event {
        id: Id::from(state.next_id),
        code: request.code,
        title: request.title,
        description: request.description,
        organizer_name: request.organizer_name,
        organizer_email: request.organizer_email,
        language: request.language,
        max_participants: request.max_participants,
        status: EventStatus::Active,
        created_at: Some(chrono::Utc::now()),
    };
    state.events.push(event.clone());
    (StatusCode::CREATED, Json(event)).into_response()
}

async fn list_questions(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.hit("GET /questions");
    if state.fail_reads {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let Some(event_id) = params.get("eventId") else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "eventId is required" })),
        )
            .into_response();
    };

    let questions: Vec<Question> = state
        .questions
        .iter()
        .filter(|q| q.event_id.as_str() == event_id)
        .cloned()
        .collect();
    Json(questions).into_response()
}

async fn update_question(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.hit("PUT /questions");

    match state.questions.iter_mut().find(|q| q.id.as_str() == id) {
        Some(question) => {
            question.status = update.status;
            Json(question.clone()).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Question not found" })),
        )
            .into_response(),
    }
}
