use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Assistant,
    User,
}

/// One message in the session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub sender: Sender,
    pub text: String,
    /// Set on the rendered protocol steps that follow a critical node's prompt.
    pub is_protocol_block: bool,
}

impl TranscriptEntry {
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
            is_protocol_block: false,
        }
    }
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            is_protocol_block: false,
        }
    }
    pub fn protocol(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
            is_protocol_block: true,
        }
    }
}

impl std::fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role = match self.sender {
            Sender::Assistant => "assistant",
            Sender::User => "user",
        };
        write!(f, "[{role}]: {}", self.text)
    }
}

/// Per-session conversation state. Only the engine creates or advances it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    pub(crate) current_node_id: String,
    pub(crate) transcript: Vec<TranscriptEntry>,
}

impl ConversationState {
    pub fn current_node_id(&self) -> &str {
        &self.current_node_id
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }
}
