use proptest::prelude::*;

use super::engine::{render_protocol, TriageEngine};
use super::node::{Choice, DialogueNode, UrgencyStyle};
use super::tree::DialogueTree;
use super::{ConversationState, DialogueError};

// Closed trees of 1..8 nodes with random (possibly cyclic) edges.
fn arbitrary_tree() -> impl Strategy<Value = DialogueTree> {
    (1usize..8)
        .prop_flat_map(|n| {
            prop::collection::vec(
                (
                    prop::collection::vec(0..n, 0..4),
                    prop::option::of(prop::collection::vec("[a-z ]{1,12}", 0..4)),
                ),
                n,
            )
        })
        .prop_map(|specs| {
            let nodes = specs
                .into_iter()
                .enumerate()
                .map(|(i, (targets, steps))| DialogueNode {
                    id: format!("n{i}"),
                    prompt: format!("prompt {i}"),
                    options: targets
                        .into_iter()
                        .enumerate()
                        .map(|(j, t)| {
                            let style = UrgencyStyle::Primary;
                            Choice::new(format!("option {j}"), format!("n{t}"), style)
                        })
                        .collect(),
                    protocol_steps: steps,
                })
                .collect();
            DialogueTree::from_nodes("n0", nodes).unwrap()
        })
}

fn walk(engine: &TriageEngine, picks: &[usize]) -> ConversationState {
    picks.iter().fold(engine.start(), |state, &i| {
        engine.select_option(&state, i).unwrap_or(state)
    })
}

proptest! {
    #[test]
    fn prop_start_holds_only_root_prompt(tree in arbitrary_tree()) {
        let engine = TriageEngine::new(tree).unwrap();
        let state = engine.start();
        prop_assert_eq!(state.current_node_id(), "n0");
        prop_assert_eq!(state.transcript().len(), 1);
        prop_assert_eq!(state.transcript()[0].text.as_str(), "prompt 0");
    }

    #[test]
    fn prop_selection_appends_two_or_three_entries(
        tree in arbitrary_tree(),
        picks in prop::collection::vec(0usize..5, 0..30)
    ) {
        let engine = TriageEngine::new(tree).unwrap();
        let mut state = engine.start();

        for pick in picks {
            let node = engine.current_node(&state).unwrap().clone();
            match engine.select_option(&state, pick) {
                Ok(next) => {
                    let target = engine.tree().get(&node.options[pick].target_node_id).unwrap();
                    let expected = if target.protocol().is_some() { 3 } else { 2 };
                    prop_assert_eq!(next.transcript().len(), state.transcript().len() + expected);
                    prop_assert_eq!(next.current_node_id(), target.id.as_str());
                    prop_assert_eq!(&next.transcript()[..state.transcript().len()], state.transcript());
                    state = next;
                }
                Err(err) => {
                    prop_assert!(pick >= node.options.len());
                    prop_assert_eq!(
                        err,
                        DialogueError::InvalidChoice {
                            node_id: node.id.clone(),
                            index: pick,
                            available: node.options.len(),
                        }
                    );
                }
            }
        }
    }

    #[test]
    fn prop_protocol_steps_render_in_declared_order(
        steps in prop::collection::vec("[A-Za-z .,]{1,30}", 1..8)
    ) {
        let rendered = render_protocol(&steps);
        let lines: Vec<&str> = rendered
            .lines()
            .skip(1)
            .map(|l| l.strip_prefix("• ").unwrap_or(l))
            .collect();
        let expected: Vec<&str> = steps.iter().map(|s| s.as_str()).collect();
        prop_assert_eq!(lines, expected);
    }

    #[test]
    fn prop_reset_returns_to_root(
        tree in arbitrary_tree(),
        picks in prop::collection::vec(0usize..4, 0..20),
        text in prop::sample::select(vec!["reset please", "RESET", "Please Reset now", "reSeT"])
    ) {
        let engine = TriageEngine::new(tree).unwrap();
        let state = walk(&engine, &picks);
        let next = engine.handle_free_text(&state, text);

        prop_assert_eq!(next.current_node_id(), "n0");
        prop_assert_eq!(next.transcript().len(), state.transcript().len() + 3);
        prop_assert_eq!(next.transcript().last().unwrap().text.as_str(), "prompt 0");
    }

    #[test]
    fn prop_other_text_never_moves(
        tree in arbitrary_tree(),
        picks in prop::collection::vec(0usize..4, 0..20),
        text in "[a-qs-z]{1,20}"
    ) {
        let engine = TriageEngine::new(tree).unwrap();
        let state = walk(&engine, &picks);
        let next = engine.handle_free_text(&state, &text);

        prop_assert_eq!(next.current_node_id(), state.current_node_id());
        prop_assert_eq!(next.transcript().len(), state.transcript().len() + 2);
    }
}
