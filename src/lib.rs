//! Organizer-side moderation core for live audience Q&A events.
//!
//! The backend owns events and questions. This crate keeps polled read
//! replicas of them, applies moderation decisions, and derives the
//! participant join link for each event.

pub mod client;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

pub use client::{HttpBackend, ModerationBackend};
pub use config::Config;
pub use services::{ModerationAction, ModerationController};
pub use utils::error::ModerationError;
