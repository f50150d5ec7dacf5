//! Scripted first-aid triage: a validated decision tree and the engine that
//! walks it one selection at a time.

pub mod engine;
pub mod error;
pub mod node;
pub mod transcript;
pub mod tree;

#[cfg(test)]
mod proptests;

pub use engine::TriageEngine;
pub use error::{ConfigurationError, DialogueError};
pub use node::{Choice, DialogueNode, UrgencyStyle};
pub use transcript::{ConversationState, Sender, TranscriptEntry};
pub use tree::{first_aid_protocols, DialogueTree};
