use serde::{Deserialize, Serialize};

/// A single step of the scripted triage conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueNode {
    /// Unique identifier for this node (e.g. "root", "bleed_1", "burn_major").
    pub id: String,
    /// The line the assistant says when entering this node.
    pub prompt: String,
    /// Selectable continuations, in display order.
    #[serde(default)]
    pub options: Vec<Choice>,
    /// Ordered procedure delivered on critical nodes. Never reordered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_steps: Option<Vec<String>>,
}

impl DialogueNode {
    /// Protocol steps, if the node carries a non-empty procedure.
    pub fn protocol(&self) -> Option<&[String]> {
        self.protocol_steps
            .as_deref()
            .filter(|steps| !steps.is_empty())
    }
}

/// An edge out of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    // ID of an existing node
    pub target_node_id: String,
    // Presentation hint only
    #[serde(default)]
    pub urgency_style: UrgencyStyle,
}

impl Choice {
    pub fn new(label: impl Into<String>, target: impl Into<String>, style: UrgencyStyle) -> Self {
        Self {
            label: label.into(),
            target_node_id: target.into(),
            urgency_style: style,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyStyle {
    #[default]
    Primary,
    Secondary,
    Danger,
}

impl std::fmt::Display for UrgencyStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UrgencyStyle::Primary => "primary",
            UrgencyStyle::Secondary => "secondary",
            UrgencyStyle::Danger => "danger",
        };
        f.write_str(s)
    }
}
