use std::collections::HashMap;

use serde::Deserialize;

use crate::dialogue::error::ConfigurationError;
use crate::dialogue::node::{Choice, DialogueNode, UrgencyStyle};

/// The full triage tree: a map of node-id -> DialogueNode plus the entry node.
///
/// Nodes reference each other by id only, so cycles back to the root are
/// ordinary edges.
#[derive(Debug, Clone)]
pub struct DialogueTree {
    nodes: HashMap<String, DialogueNode>,
    root_id: String,
}

/// On-disk shape of a tree document.
#[derive(Debug, Deserialize)]
struct TreeDocument {
    root_id: String,
    nodes: Vec<DialogueNode>,
}

impl DialogueTree {
    /// Build a tree from a node list. Node ids must be unique.
    pub fn from_nodes(
        root_id: impl Into<String>,
        nodes: Vec<DialogueNode>,
    ) -> Result<Self, ConfigurationError> {
        let mut map = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if map.contains_key(&node.id) {
                return Err(ConfigurationError::DuplicateNode(node.id));
            }
            map.insert(node.id.clone(), node);
        }

        Ok(Self {
            nodes: map,
            root_id: root_id.into(),
        })
    }

    /// Parse a JSON tree document:
    ///
    /// ```json
    /// { "root_id": "root",
    ///   "nodes": [ { "id": "root", "prompt": "...", "options": [...] } ] }
    /// ```
    pub fn from_json(document: &str) -> Result<Self, ConfigurationError> {
        let doc: TreeDocument = serde_json::from_str(document)
            .map_err(|e| ConfigurationError::Malformed(e.to_string()))?;
        Self::from_nodes(doc.root_id, doc.nodes)
    }

    pub fn get(&self, id: &str) -> Option<&DialogueNode> {
        self.nodes.get(id)
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DialogueNode> {
        self.nodes.values()
    }

    /// Check the closed-graph invariants: the root exists and every choice
    /// targets a node in the tree.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.nodes.contains_key(&self.root_id) {
            return Err(ConfigurationError::MissingRoot(self.root_id.clone()));
        }

        // Sorted so the reported edge does not depend on hash order.
        let mut ids: Vec<&String> = self.nodes.keys().collect();
        ids.sort();

        for id in ids {
            let node = &self.nodes[id];
            if let Some(choice) = node
                .options
                .iter()
                .find(|choice| !self.nodes.contains_key(&choice.target_node_id))
            {
                return Err(ConfigurationError::DanglingEdge {
                    node_id: node.id.clone(),
                    label: choice.label.clone(),
                    target: choice.target_node_id.clone(),
                });
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// First-aid protocols
// ---------------------------------------------------------------------------

fn decision(id: &str, prompt: &str, options: Vec<Choice>) -> DialogueNode {
    DialogueNode {
        id: id.into(),
        prompt: prompt.into(),
        options,
        protocol_steps: None,
    }
}

fn protocol(id: &str, prompt: &str, done: Choice, steps: &[&str]) -> DialogueNode {
    DialogueNode {
        id: id.into(),
        prompt: prompt.into(),
        options: vec![done],
        protocol_steps: Some(steps.iter().map(|s| s.to_string()).collect()),
    }
}

/// The built-in first-aid tree. Every protocol node loops back to "root".
pub fn first_aid_protocols() -> DialogueTree {
    use UrgencyStyle::{Danger, Primary, Secondary};

    let nodes = vec![
        decision(
            "root",
            "I am Emerge AI. What is the primary emergency?",
            vec![
                Choice::new("Significant Bleeding", "bleed_1", Danger),
                Choice::new("Breathing Difficulty", "breath_1", Danger),
                Choice::new("Bone Fracture", "bone_1", Secondary),
                Choice::new("Burn Injury", "burn_1", Secondary),
            ],
        ),
        // --- Bleeding ---
        decision(
            "bleed_1",
            "Is the blood bright red and spurting (pulsing with heartbeat)?",
            vec![
                Choice::new("Yes, Spurting", "bleed_arterial", Danger),
                Choice::new("No, Oozing/Flowing", "bleed_venous", Secondary),
            ],
        ),
        protocol(
            "bleed_arterial",
            "CRITICAL: Arterial Bleeding detected. Initiating Hemorrhage Control.",
            Choice::new("Protocol Complete", "root", Primary),
            &[
                "Apply direct pressure IMMEDIATELY.",
                "Apply Tourniquet 2-3 inches above wound.",
                "Tighten until bleeding STOPS completely.",
                "Note time of application.",
            ],
        ),
        protocol(
            "bleed_venous",
            "Standard bleeding protocol initiated.",
            Choice::new("Bleeding Stopped", "root", Primary),
            &[
                "Apply firm direct pressure with clean cloth.",
                "Elevate the limb above heart level.",
                "Apply pressure bandage.",
            ],
        ),
        // --- Breathing ---
        decision(
            "breath_1",
            "Is the airway completely blocked (choking)?",
            vec![
                Choice::new("Yes, Can't Speak", "breath_choke", Danger),
                Choice::new("No, Wheezing", "breath_asthma", Secondary),
            ],
        ),
        protocol(
            "breath_choke",
            "Initiate Heimlich Maneuver sequence.",
            Choice::new("Airway Clear", "root", Primary),
            &[
                "Stand behind patient.",
                "Make fist above navel.",
                "Thrust inward and upward aggressively.",
                "Repeat until object creates exit.",
            ],
        ),
        protocol(
            "breath_asthma",
            "Assisting respiration.",
            Choice::new("Return to Menu", "root", Secondary),
            &[
                "Sit patient upright (Tripod position).",
                "Loosen tight clothing.",
                "Assist with inhaler if available.",
                "Box breathing: In 4s, Hold 4s, Out 4s.",
            ],
        ),
        // --- Fractures ---
        decision(
            "bone_1",
            "Do not move the patient. Is the bone visible (Compound)?",
            vec![
                Choice::new("Yes, Bone Visible", "bone_compound", Danger),
                Choice::new("No, Swelling/Pain", "bone_simple", Secondary),
            ],
        ),
        protocol(
            "bone_compound",
            "CRITICAL: Compound Fracture.",
            Choice::new("Understood", "root", Primary),
            &[
                "Control bleeding around bone.",
                "Do NOT push bone back in.",
                "Cover with sterile dressing.",
                "Splint in position found.",
            ],
        ),
        protocol(
            "bone_simple",
            "Fracture Management.",
            Choice::new("Understood", "root", Primary),
            &[
                "Immobilize joint above and below.",
                "Apply ice packs (max 20 mins).",
                "Elevate limb.",
            ],
        ),
        // --- Burns ---
        decision(
            "burn_1",
            "Burn Severity Check. Is skin charred, white, or leathery?",
            vec![
                Choice::new("Yes (3rd Degree)", "burn_major", Danger),
                Choice::new("No (Red/Blistered)", "burn_minor", Secondary),
            ],
        ),
        protocol(
            "burn_major",
            "Major Burn Protocol.",
            Choice::new("Done", "root", Primary),
            &[
                "Cover with sterile, non-stick bandage.",
                "Elevate burned area.",
                "Treat for shock.",
                "Do NOT apply water.",
            ],
        ),
        protocol(
            "burn_minor",
            "Minor Burn Protocol.",
            Choice::new("Done", "root", Primary),
            &[
                "Run cool (not cold) water for 20 mins.",
                "Remove rings/items before swelling.",
                "Apply antibiotic ointment.",
            ],
        ),
    ];

    let mut map = HashMap::new();
    for node in nodes {
        map.insert(node.id.clone(), node);
    }

    DialogueTree {
        nodes: map,
        root_id: "root".into(),
    }
}
