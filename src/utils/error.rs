use thiserror::Error;
use tracing::{debug, error, warn};

use crate::models::QuestionStatus;

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Validation error on {field}: {message}")]
    ValidationError {
        field: &'static str,
        message: String,
    },

    /// Duplicate event code. The backend message is kept verbatim.
    #[error("{0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Question is already {0}")]
    NoOpTransition(QuestionStatus),

    #[error("Backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP error")]
    Http(#[from] reqwest::Error),

    #[error("Malformed backend response")]
    Decode(#[from] serde_json::Error),

    #[error("Moderation session closed")]
    Cancelled,
}

impl ModerationError {
    pub fn code(&self) -> &'static str {
        match self {
            ModerationError::ValidationError { .. } => "VALIDATION_ERROR",
            ModerationError::Conflict(_) => "CONFLICT",
            ModerationError::NotFound(_) => "NOT_FOUND",
            ModerationError::NoOpTransition(_) => "NO_OP_TRANSITION",
            ModerationError::Rejected { .. } => "REJECTED",
            ModerationError::Transport(_) | ModerationError::Http(_) => "TRANSPORT_ERROR",
            ModerationError::Decode(_) => "DECODE_ERROR",
            ModerationError::Cancelled => "CANCELLED",
        }
    }

    /// True for failures of the channel itself rather than a backend verdict.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ModerationError::Transport(_) | ModerationError::Http(_) | ModerationError::Decode(_)
        )
    }

    /// Message safe to show to the organizer.
    pub fn public_message(&self) -> String {
        match self {
            ModerationError::ValidationError { message, .. } => message.clone(),
            ModerationError::Conflict(msg)
            | ModerationError::NotFound(msg)
            | ModerationError::Transport(msg) => msg.clone(),
            ModerationError::Rejected { message, .. } => message.clone(),
            ModerationError::NoOpTransition(_) | ModerationError::Cancelled => self.to_string(),
            ModerationError::Http(_) | ModerationError::Decode(_) => {
                "The backend could not be reached".to_string()
            }
        }
    }

    pub fn log(&self) {
        match self {
            ModerationError::ValidationError { field, message } => {
                warn!(code = self.code(), field, message = %message, "Rejected before sending");
            }
            ModerationError::NoOpTransition(status) => {
                warn!(code = self.code(), %status, "Rejected before sending");
            }
            ModerationError::Cancelled => {
                debug!(code = self.code(), "Abandoned on teardown");
            }
            ModerationError::Http(e) => {
                error!(code = self.code(), error = ?e, "HTTP error");
            }
            ModerationError::Decode(e) => {
                error!(code = self.code(), error = ?e, "Decode error");
            }
            _ => {
                error!(code = self.code(), error = %self, "Moderation error");
            }
        }
    }
}
