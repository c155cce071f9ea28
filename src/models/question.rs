use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Id, Language};

/// Moderation status of a question. `Pending` is assigned on submission;
/// every other value is an organizer decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Pending,
    Approved,
    Declined,
    Answered,
}

impl QuestionStatus {
    pub const ALL: [QuestionStatus; 4] = [
        QuestionStatus::Pending,
        QuestionStatus::Approved,
        QuestionStatus::Declined,
        QuestionStatus::Answered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionStatus::Pending => "pending",
            QuestionStatus::Approved => "approved",
            QuestionStatus::Declined => "declined",
            QuestionStatus::Answered => "answered",
        }
    }

    pub fn label(&self, language: Language) -> &'static str {
        match (language, self) {
            (Language::En, QuestionStatus::Pending) => "Pending",
            (Language::En, QuestionStatus::Approved) => "Approved",
            (Language::En, QuestionStatus::Declined) => "Declined",
            (Language::En, QuestionStatus::Answered) => "Answered",
            (Language::Pl, QuestionStatus::Pending) => "Oczekujące",
            (Language::Pl, QuestionStatus::Approved) => "Zatwierdzone",
            (Language::Pl, QuestionStatus::Declined) => "Odrzucone",
            (Language::Pl, QuestionStatus::Answered) => "Odpowiedziane",
        }
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Id,
    pub event_id: Id,
    pub participant_name: String,
    #[serde(default)]
    pub participant_email: Option<String>,
    pub question_text: String,
    pub status: QuestionStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Wire body of `PUT /questions/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: QuestionStatus,
}
