use std::sync::Arc;

use crate::models::{Event, Language};
use crate::routes::EventDraftInput;
use crate::services::{ModerationAction, ModerationController};
use crate::utils::error::ModerationError;
use crate::utils::response::{render_error, render_events, render_join_link, render_questions};

const HELP: &str = "\
events                              list events
create code=.. title=.. name=.. email=.. [description=..] [max=..]
select <code>                       moderate an event
deselect                            stop moderating
questions                           list questions of the selected event
approve <id> | decline <id> | answer <id>
link <code>                         join link and QR image URL
lang <en|pl>                        switch display language
quit";

#[derive(Debug, PartialEq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// Console session state: the controller plus the display language.
pub struct Console {
    pub controller: Arc<ModerationController>,
    pub language: Language,
}

impl Console {
    pub fn new(controller: Arc<ModerationController>) -> Self {
        let language = controller.config().language;
        Self {
            controller,
            language,
        }
    }

    async fn event_by_code(&self, code: &str) -> Option<Event> {
        if let Some(event) = self.controller.directory().find_by_code(code) {
            return Some(event);
        }
        self.controller
            .directory()
            .list_events()
            .await
            .into_iter()
            .find(|e| e.code == code)
    }

    fn text(&self, en: &str, pl: &str) -> String {
        match self.language {
            Language::En => en.to_string(),
            Language::Pl => pl.to_string(),
        }
    }
}

pub async fn list_events(console: &mut Console) -> Reply {
    let events = console.controller.directory().list_events().await;
    Reply::Output(render_events(&events, console.language))
}

pub async fn create_event(console: &mut Console, input: EventDraftInput) -> Reply {
    let draft = input.into_draft(console.language);
    match console.controller.create_event(&draft).await {
        Ok(event) => {
            let link = console.controller.join_link(&event);
            Reply::Output(format!(
                "{}\n{}",
                console.text(
                    "Event created successfully!",
                    "Wydarzenie zostało utworzone pomyślnie!"
                ),
                render_join_link(&event, &link)
            ))
        }
        Err(e) => Reply::Output(render_error(&e)),
    }
}

pub async fn select_event(console: &mut Console, code: &str) -> Reply {
    let Some(event) = console.event_by_code(code).await else {
        return Reply::Output(format!("error: no event with code '{}'", code));
    };

    console.controller.select_event(Some(event.clone()));
    let questions = console.controller.refresh_questions().await;
    Reply::Output(render_questions(&event, &questions, console.language))
}

pub fn deselect_event(console: &mut Console) -> Reply {
    console.controller.select_event(None);
    Reply::Output(console.text(
        "Select an event to manage questions",
        "Wybierz wydarzenie, aby zarządzać pytaniami",
    ))
}

pub async fn list_questions(console: &mut Console) -> Reply {
    let Some(event) = console.controller.selected_event() else {
        return Reply::Output(console.text(
            "Select an event to manage questions",
            "Wybierz wydarzenie, aby zarządzać pytaniami",
        ));
    };

    let questions = console.controller.refresh_questions().await;
    Reply::Output(render_questions(&event, &questions, console.language))
}

pub async fn moderate(console: &mut Console, id: &str, action: ModerationAction) -> Reply {
    if console.controller.selected_event().is_none() {
        return Reply::Output(console.text(
            "Select an event to manage questions",
            "Wybierz wydarzenie, aby zarządzać pytaniami",
        ));
    }

    let Some(question) = console.controller.find_question(id) else {
        return Reply::Output(format!("error: unknown question #{}", id));
    };

    match console.controller.apply(&question, action).await {
        Ok(updated) => Reply::Output(format!(
            "{} #{} -> {}",
            console.text("Question updated!", "Pytanie zostało zaktualizowane!"),
            updated.id,
            updated.status.label(console.language)
        )),
        Err(ModerationError::NoOpTransition(status)) => Reply::Output(format!(
            "error: {} {}",
            console.text("Question is already", "Pytanie ma już status"),
            match console.language {
                Language::En => status.as_str().to_string(),
                Language::Pl => status.label(Language::Pl).to_lowercase(),
            }
        )),
        Err(e) if e.is_transport() => Reply::Output(format!(
            "error: {}",
            console.text(
                "Failed to update question",
                "Nie udało się zaktualizować pytania"
            )
        )),
        Err(e) => Reply::Output(render_error(&e)),
    }
}

pub async fn join_link(console: &mut Console, code: &str) -> Reply {
    match console.event_by_code(code).await {
        Some(event) => {
            let link = console.controller.join_link(&event);
            Reply::Output(render_join_link(&event, &link))
        }
        None => Reply::Output(format!("error: no event with code '{}'", code)),
    }
}

pub fn set_language(console: &mut Console, language: Language) -> Reply {
    console.language = language;
    Reply::Output(format!("language: {}", language.as_str()))
}

pub fn help() -> Reply {
    Reply::Output(HELP.to_string())
}
