use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::cache::QueryCache;
use crate::client::ModerationBackend;
use crate::models::{Event, EventDraft};
use crate::utils::error::ModerationError;

const EVENTS_KEY: &str = "events";

/// Event list replica plus event creation.
pub struct EventDirectory {
    backend: Arc<dyn ModerationBackend>,
    cache: QueryCache<&'static str, Vec<Event>>,
    max_age: Duration,
}

impl EventDirectory {
    /// `max_age` bounds how long [`list_events`](Self::list_events) may serve
    /// a cached list; zero always refetches.
    pub fn new(backend: Arc<dyn ModerationBackend>, max_age: Duration) -> Self {
        Self {
            backend,
            cache: QueryCache::new(),
            max_age,
        }
    }

    /// Current event set. Never fails: transport problems yield an empty list.
    pub async fn list_events(&self) -> Vec<Event> {
        if let Some(events) = self.cache.fresh(&EVENTS_KEY, self.max_age) {
            return events;
        }
        self.refresh().await
    }

    /// Fetches from the backend and replaces the cached list.
    pub async fn refresh(&self) -> Vec<Event> {
        let events = match self.backend.list_events().await {
            Ok(events) => events,
            Err(e) => {
                warn!(code = e.code(), error = %e, "Event list unavailable, showing none");
                Vec::new()
            }
        };
        self.cache.store(EVENTS_KEY, events.clone());
        events
    }

    /// Last fetched list, for display between polls.
    pub fn cached_events(&self) -> Vec<Event> {
        self.cache.snapshot(&EVENTS_KEY).unwrap_or_default()
    }

    pub fn find_by_code(&self, code: &str) -> Option<Event> {
        self.cached_events().into_iter().find(|e| e.code == code)
    }

    /// Validates and submits a new event, then invalidates the list.
    pub async fn create_event(&self, draft: &EventDraft) -> Result<Event, ModerationError> {
        let request = draft.validate().inspect_err(ModerationError::log)?;

        let event = self
            .backend
            .create_event(&request)
            .await
            .inspect_err(ModerationError::log)?;

        info!(event_id = %event.id, event_code = %event.code, "Event created");
        self.cache.invalidate(&EVENTS_KEY);
        Ok(event)
    }

    pub(crate) fn invalidation_signal(&self) -> Arc<tokio::sync::Notify> {
        self.cache.invalidation_signal()
    }

    pub fn is_stale(&self) -> bool {
        self.cache.is_stale(&EVENTS_KEY)
    }
}
