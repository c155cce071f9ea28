use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Id;
use crate::utils::error::ModerationError;

pub const DEFAULT_MAX_PARTICIPANTS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pl,
}

impl Language {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "en" => Some(Language::En),
            "pl" => Some(Language::Pl),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Pl => "pl",
        }
    }
}

/// Lifecycle is owned by the backend; the client only observes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Paused,
    Closed,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventStatus::Active => "active",
            EventStatus::Paused => "paused",
            EventStatus::Closed => "closed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Id,
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub organizer_name: String,
    pub organizer_email: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_max_participants")]
    pub max_participants: u32,
    pub status: EventStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_max_participants() -> u32 {
    DEFAULT_MAX_PARTICIPANTS
}

/// Raw organizer input for a new event, before validation.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub organizer_name: String,
    pub organizer_email: String,
    pub language: Language,
    /// Free-form form input; see [`parse_max_participants`].
    pub max_participants: Option<String>,
}

/// Wire body of `POST /events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub organizer_name: String,
    pub organizer_email: String,
    pub language: Language,
    pub max_participants: u32,
}

impl EventDraft {
    pub fn new(
        code: impl Into<String>,
        title: impl Into<String>,
        organizer_name: impl Into<String>,
        organizer_email: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            organizer_name: organizer_name.into(),
            organizer_email: organizer_email.into(),
            ..Default::default()
        }
    }

    /// Checks required fields in form order and builds the request body.
    pub fn validate(&self) -> Result<CreateEventRequest, ModerationError> {
        let code = required("code", &self.code)?;
        let title = required("title", &self.title)?;
        let organizer_name = required("organizer_name", &self.organizer_name)?;
        let organizer_email = required("organizer_email", &self.organizer_email)?;

        if !looks_like_email(&organizer_email) {
            return Err(ModerationError::ValidationError {
                field: "organizer_email",
                message: "Enter a valid email address".to_string(),
            });
        }

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(CreateEventRequest {
            code,
            title,
            description,
            organizer_name,
            organizer_email,
            language: self.language,
            max_participants: parse_max_participants(self.max_participants.as_deref()),
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ModerationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModerationError::ValidationError {
            field,
            message: "This field is required".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Leading integer digits of the input, or the default when the input is
/// absent, non-numeric, or not positive.
pub fn parse_max_participants(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_MAX_PARTICIPANTS;
    };
    let trimmed = raw.trim_start();
    let digits = trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>();

    match digits.parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => DEFAULT_MAX_PARTICIPANTS,
    }
}
