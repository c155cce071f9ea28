pub mod cache;
pub mod directory;
pub mod moderation;
pub mod poller;
pub mod queue;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use directory::EventDirectory;
pub use moderation::{ModerationAction, ModerationController};
pub use queue::QuestionQueue;
pub use session::{SelectionScope, SessionContext};
