use log::{debug, info, trace, warn};
use regex::{Regex, RegexBuilder};

use crate::dialogue::error::{ConfigurationError, DialogueError};
use crate::dialogue::node::DialogueNode;
use crate::dialogue::transcript::{ConversationState, TranscriptEntry};
use crate::dialogue::tree::DialogueTree;

/// Sent whenever free text is typed instead of picking an option.
pub const FALLBACK_REPLY: &str = "I am optimizing for specific protocols. Please select an option above for accurate triage, or type 'Reset' to start over.";

/// Header line of every rendered protocol block.
pub const PROTOCOL_HEADER: &str = "PROTOCOL STEPS:";

pub const DEFAULT_RESET_KEYWORD: &str = "reset";

/// Walks a validated [`DialogueTree`]. The engine is immutable once built;
/// every transition takes a state by reference and returns a new one.
#[derive(Debug, Clone)]
pub struct TriageEngine {
    tree: DialogueTree,
    reset_pattern: Regex,
}

impl TriageEngine {
    pub fn new(tree: DialogueTree) -> Result<Self, DialogueError> {
        Self::with_reset_keyword(tree, DEFAULT_RESET_KEYWORD)
    }

    /// Like [`TriageEngine::new`] with a custom token that restarts the
    /// session when it appears anywhere in free text (case-insensitive).
    pub fn with_reset_keyword(tree: DialogueTree, keyword: &str) -> Result<Self, DialogueError> {
        tree.validate()?;

        if keyword.trim().is_empty() {
            return Err(ConfigurationError::InvalidResetKeyword.into());
        }
        let reset_pattern = RegexBuilder::new(&regex::escape(keyword))
            .case_insensitive(true)
            .build()
            .map_err(|_| ConfigurationError::InvalidResetKeyword)?;

        info!(
            "Triage engine ready: {} nodes, root '{}'",
            tree.len(),
            tree.root_id()
        );

        Ok(Self {
            tree,
            reset_pattern,
        })
    }

    pub fn tree(&self) -> &DialogueTree {
        &self.tree
    }

    /// A fresh session at the root, seeded with the root prompt.
    pub fn start(&self) -> ConversationState {
        let root = self.root();
        debug!("Session started at node: {}", root.id);
        ConversationState {
            current_node_id: root.id.clone(),
            transcript: vec![TranscriptEntry::assistant(&root.prompt)],
        }
    }

    pub fn current_node(
        &self,
        state: &ConversationState,
    ) -> Result<&DialogueNode, DialogueError> {
        self.tree
            .get(&state.current_node_id)
            .ok_or_else(|| DialogueError::UnknownNode(state.current_node_id.clone()))
    }

    /// Follow option `index` of the current node.
    pub fn select_option(
        &self,
        state: &ConversationState,
        index: usize,
    ) -> Result<ConversationState, DialogueError> {
        let node = self.current_node(state)?;

        let Some(choice) = node.options.get(index) else {
            warn!(
                "Option {index} rejected at node '{}' ({} available)",
                node.id,
                node.options.len()
            );
            return Err(DialogueError::InvalidChoice {
                node_id: node.id.clone(),
                index,
                available: node.options.len(),
            });
        };

        let target = self
            .tree
            .get(&choice.target_node_id)
            .ok_or_else(|| DialogueError::UnknownNode(choice.target_node_id.clone()))?;

        info!(
            "Transition: {} -> {} (choice: \"{}\")",
            node.id, target.id, choice.label
        );

        let mut next = state.clone();
        next.transcript.push(TranscriptEntry::user(&choice.label));
        next.current_node_id = target.id.clone();
        next.transcript.push(TranscriptEntry::assistant(&target.prompt));

        if let Some(steps) = target.protocol() {
            debug!("Delivering {} protocol steps for '{}'", steps.len(), target.id);
            next.transcript
                .push(TranscriptEntry::protocol(render_protocol(steps)));
        }

        Ok(next)
    }

    /// Handle typed input. Never follows an edge; restarts at the root when
    /// the text contains the reset keyword.
    pub fn handle_free_text(&self, state: &ConversationState, text: &str) -> ConversationState {
        if text.trim().is_empty() {
            trace!("Ignoring blank free text");
            return state.clone();
        }

        info!("Free text at node '{}': \"{text}\"", state.current_node_id);

        let mut next = state.clone();
        next.transcript.push(TranscriptEntry::user(text));
        next.transcript.push(TranscriptEntry::assistant(FALLBACK_REPLY));

        if self.reset_pattern.is_match(text) {
            let root = self.root();
            info!("Reset: {} -> {}", state.current_node_id, root.id);
            next.current_node_id = root.id.clone();
            next.transcript.push(TranscriptEntry::assistant(&root.prompt));
        }

        next
    }

    fn root(&self) -> &DialogueNode {
        self.tree
            .get(self.tree.root_id())
            .expect("root node is checked when the engine is built")
    }
}

/// Render protocol steps as a bulleted block, one step per line, in order.
pub fn render_protocol(steps: &[String]) -> String {
    let mut s = String::from(PROTOCOL_HEADER);
    for step in steps {
        s.push_str("\n• ");
        s.push_str(step);
    }
    s
}
