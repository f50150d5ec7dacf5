//! Dialogue error types

use thiserror::Error;

/// The supplied tree violates an integrity invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("root node '{0}' is not present in the tree")]
    MissingRoot(String),

    #[error("choice '{label}' on node '{node_id}' points at unknown node '{target}'")]
    DanglingEdge {
        node_id: String,
        label: String,
        target: String,
    },

    #[error("node id '{0}' is declared more than once")]
    DuplicateNode(String),

    #[error("malformed tree document: {0}")]
    Malformed(String),

    #[error("reset keyword must not be empty")]
    InvalidResetKeyword,
}

/// Errors returned by the triage engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogueError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("option {index} is not available at node '{node_id}' ({available} options)")]
    InvalidChoice {
        node_id: String,
        index: usize,
        available: usize,
    },

    #[error("node '{0}' is not part of this engine's tree")]
    UnknownNode(String),
}
