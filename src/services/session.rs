//! Session context: which event the organizer is moderating.
//!
//! Every selection change bumps a generation counter. Work started for an
//! older generation is superseded and its results must be dropped.

use tokio::sync::watch;

use crate::models::{Event, Id};

/// Identity of one selection: the event plus the generation it was made in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionScope {
    pub event_id: Id,
    pub generation: u64,
}

#[derive(Debug, Clone, Default)]
struct Selection {
    event: Option<Event>,
    generation: u64,
}

pub struct SessionContext {
    selection: watch::Sender<Selection>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        let (selection, _) = watch::channel(Selection::default());
        Self { selection }
    }

    /// Replaces the selection and returns the new scope, if any.
    pub fn select(&self, event: Option<Event>) -> Option<SelectionScope> {
        let mut scope = None;
        self.selection.send_modify(|current| {
            current.generation += 1;
            scope = event.as_ref().map(|e| SelectionScope {
                event_id: e.id.clone(),
                generation: current.generation,
            });
            current.event = event;
        });
        scope
    }

    pub fn selected_event(&self) -> Option<Event> {
        self.selection.borrow().event.clone()
    }

    pub fn current_scope(&self) -> Option<SelectionScope> {
        let selection = self.selection.borrow();
        selection.event.as_ref().map(|e| SelectionScope {
            event_id: e.id.clone(),
            generation: selection.generation,
        })
    }

    /// False once the selection has moved on from `scope`.
    pub fn is_current(&self, scope: &SelectionScope) -> bool {
        let selection = self.selection.borrow();
        selection.generation == scope.generation
            && selection.event.as_ref().map(|e| &e.id) == Some(&scope.event_id)
    }
}
