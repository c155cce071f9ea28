use std::fmt::Write as _;

use serde::Deserialize;

use crate::models::{Event, Language, Question};
use crate::utils::error::ModerationError;
use crate::utils::join_link::JoinLink;

/// Error payload returned by the backend on failed mutations.
#[derive(Debug, Deserialize)]
pub struct BackendErrorBody {
    pub error: Option<String>,
}

/// Extracts `error` from a `{error: string}` body, or returns the fallback.
pub fn backend_error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<BackendErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|msg| !msg.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

pub fn render_events(events: &[Event], language: Language) -> String {
    if events.is_empty() {
        return match language {
            Language::En => "No events created yet".to_string(),
            Language::Pl => "Nie utworzono jeszcze żadnych wydarzeń".to_string(),
        };
    }

    let mut out = String::new();
    for event in events {
        let _ = writeln!(
            out,
            "[{}] {} (code: {}, max {}) {}",
            event.status,
            event.title,
            event.code,
            event.max_participants,
            event.description.as_deref().unwrap_or("")
        );
    }
    out.trim_end().to_string()
}

pub fn render_questions(event: &Event, questions: &[Question], language: Language) -> String {
    let mut out = format!("{} (code: {})\n", event.title, event.code);
    if questions.is_empty() {
        out.push_str(match language {
            Language::En => "No questions for this event",
            Language::Pl => "Brak pytań dla tego wydarzenia",
        });
        return out;
    }

    for question in questions {
        let _ = writeln!(
            out,
            "#{} [{}] {}{}: {}",
            question.id,
            question.status.label(language),
            question.participant_name,
            question
                .participant_email
                .as_deref()
                .map(|e| format!(" <{}>", e))
                .unwrap_or_default(),
            question.question_text
        );
    }
    out.trim_end().to_string()
}

pub fn render_join_link(event: &Event, link: &JoinLink) -> String {
    format!("{}\n  link: {}\n  qr:   {}", event.code, link.url, link.qr_image_url)
}

pub fn render_error(err: &ModerationError) -> String {
    match err {
        ModerationError::ValidationError { field, message } => {
            format!("error: {}: {}", field, message)
        }
        _ => format!("error: {}", err.public_message()),
    }
}
