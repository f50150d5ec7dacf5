//! Scripted first-aid triage assistant.
//!
//! [`dialogue`] holds the decision tree and the pure state-transition engine;
//! [`session`] is a line-oriented terminal front end for it.

pub mod dialogue;
pub mod session;
