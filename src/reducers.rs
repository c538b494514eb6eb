// Workbench reducers - pure state transitions applying user commands

use crate::catalog::empty_parents;
use crate::commands::Command;
use crate::editor_state::{EditorState, check_constant_value, editor_properties};
use crate::nodes::{ExpectedValueType, Node, NodeType, Parents, Value};
use crate::workbench::{WorkbenchState, map_parents};
use tracing::{error, warn};

/// A reducer is a pure function over an immutable snapshot: either the whole
/// new state is produced or the old state comes back unchanged.
pub type WorkbenchReducer = fn(&WorkbenchState, &Command) -> WorkbenchState;

/// Apply one command to the state. The single dispatch point for the whole
/// command vocabulary.
pub fn reduce(state: &WorkbenchState, command: &Command) -> WorkbenchState {
    match command {
        Command::NoOp => state.clone(),
        Command::AddNode => add_node(state),
        Command::StartEditingNode { to_edit } => start_node_edit(state, to_edit),
        Command::CancelEditingNode => cancel_node_edit(state),
        Command::FinishEditingNode => finish_node_edit(state),
        Command::UpdateEditorState { new_state } => {
            update_editor_state(state, new_state)
        }
        Command::MoveNode {
            node_id,
            new_coords,
        } => move_node(state, node_id, *new_coords),
        Command::LinkNodes {
            from_node_id,
            to_node_id,
            to_input_id,
        } => link_node(state, from_node_id, to_node_id, to_input_id),
        Command::UnlinkNodes {
            from_node_id,
            to_node_id,
            to_input_id,
        } => unlink_node(state, from_node_id, to_node_id, to_input_id),
        Command::DeleteNode { node_id_to_delete } => {
            delete_node(state, node_id_to_delete)
        }
    }
}

/// The node every `AddNode` starts from, plus a title not colliding with any
/// existing node (probing "Node 1", "Node 2", ... in order).
fn default_node_with_unique_title(state: &WorkbenchState) -> (Node, String) {
    let nodes = &state.beliefs.nodes;
    let mut i = 0usize;
    let new_node_title = loop {
        i += 1;
        let candidate = format!("Node {}", i);
        if !nodes.contains_key(&candidate) {
            break candidate;
        }
    };
    let new_node = Node::Constant {
        value: Value::Number(0.0),
        value_type: ExpectedValueType::Number,
        justification: String::new(),
        coords: [100.0, 100.0],
    };
    (new_node, new_node_title)
}

fn add_node(old_state: &WorkbenchState) -> WorkbenchState {
    let (new_node, new_node_title) = default_node_with_unique_title(old_state);
    let mut state = old_state.clone();
    state.new_properties = EditorState {
        title: new_node_title.clone(),
        ..editor_properties(&new_node)
    };
    state.currently_editing = Some(new_node_title.clone());
    state.beliefs.nodes.insert(new_node_title, new_node);
    state
}

fn start_node_edit(old_state: &WorkbenchState, to_edit: &str) -> WorkbenchState {
    let Some(node) = old_state.beliefs.nodes.get(to_edit) else {
        error!(title = to_edit, "tried to edit a node that is not in the graph");
        return old_state.clone();
    };
    let mut state = old_state.clone();
    state.new_properties = EditorState {
        title: to_edit.to_string(),
        ..editor_properties(node)
    };
    state.currently_editing = Some(to_edit.to_string());
    state
}

fn cancel_node_edit(old_state: &WorkbenchState) -> WorkbenchState {
    let mut state = old_state.clone();
    state.currently_editing = None;
    state
}

fn update_editor_state(
    old_state: &WorkbenchState,
    new_state: &EditorState,
) -> WorkbenchState {
    let mut state = old_state.clone();
    state.new_properties = new_state.clone();
    state
}

/// Build the committed node a finished edit produces, or the validation
/// messages explaining why it cannot be committed. The original coordinates
/// are preserved; port wiring survives only when the node type is unchanged,
/// otherwise the new kind's empty parents map replaces it.
fn new_node_properties(
    node: &Node,
    edited: &EditorState,
) -> Result<Node, Vec<String>> {
    let parents = || -> Parents {
        if edited.node_type == node.node_type() {
            node.parents().cloned().unwrap_or_default()
        } else {
            empty_parents(
                edited.node_type,
                edited.distribution,
                edited.function,
                edited.visualization,
            )
        }
    };

    let check = check_constant_value(&edited.value, edited.value_type);
    if edited.node_type.has_value_field() && !check.is_valid {
        error!(
            value = %edited.value,
            "invalid node value specified by editor: {}",
            check.messages.join("\n")
        );
        return Err(check.messages);
    }

    let coords = node.coords();
    let justification = edited.justification.clone();
    Ok(match edited.node_type {
        NodeType::Constraint => Node::Constraint {
            value: check.parsed_value,
            value_type: edited.value_type,
            parents: parents(),
            justification,
            coords,
        },
        NodeType::Distribution => Node::Distribution {
            distribution: edited.distribution,
            parents: parents(),
            justification,
            coords,
        },
        NodeType::Function => Node::Function {
            function: edited.function,
            parents: parents(),
            justification,
            coords,
        },
        NodeType::Constant => Node::Constant {
            value: check.parsed_value,
            value_type: edited.value_type,
            justification,
            coords,
        },
        NodeType::Visualization => Node::Visualization {
            visualization: edited.visualization,
            parents: parents(),
            justification,
            coords,
        },
    })
}

fn finish_node_edit(old_state: &WorkbenchState) -> WorkbenchState {
    let to_edit = match &old_state.currently_editing {
        Some(title) if old_state.beliefs.nodes.contains_key(title) => title.clone(),
        other => {
            error!(
                record = ?other,
                "tried to finish editing but the record of the node being \
                 edited was corrupted; cancelling the edit"
            );
            let mut state = old_state.clone();
            state.currently_editing = None;
            return state;
        }
    };
    let edited = old_state.new_properties.clone();
    let new_node = new_node_properties(&old_state.beliefs.nodes[&to_edit], &edited);
    if edited.title != to_edit && old_state.beliefs.nodes.contains_key(&edited.title) {
        error!(
            title = %edited.title,
            "attempt to change the title to one already in the network"
        );
        return old_state.clone();
    }
    let new_node = match new_node {
        Ok(node) => node,
        Err(messages) => {
            error!(
                title = %to_edit,
                "an unusable edit got past node validation; staying in edit \
                 mode: {}",
                messages.join("\n")
            );
            return old_state.clone();
        }
    };
    let mut state = if edited.title == to_edit {
        old_state.clone()
    } else {
        // Rename this node in all its descendants, then drop the old key.
        let mut renamed = map_parents(old_state, |_node_id, _port_id, parent_ids| {
            parent_ids
                .iter()
                .map(|id| {
                    if *id == to_edit {
                        edited.title.clone()
                    } else {
                        id.clone()
                    }
                })
                .collect()
        });
        renamed.beliefs.nodes.remove(&to_edit);
        renamed
    };
    state.beliefs.nodes.insert(edited.title.clone(), new_node);
    state.currently_editing = None;
    state
}

fn move_node(
    old_state: &WorkbenchState,
    node_id: &str,
    new_coords: [f64; 2],
) -> WorkbenchState {
    let mut state = old_state.clone();
    match state.beliefs.nodes.get_mut(node_id) {
        Some(node) => node.set_coords(new_coords),
        None => {
            warn!(title = node_id, "move command for a node not in the graph");
            return old_state.clone();
        }
    }
    state
}

fn link_node(
    old_state: &WorkbenchState,
    from_node_id: &str,
    to_node_id: &str,
    to_input_id: &str,
) -> WorkbenchState {
    // A link may only reference an existing parent; anything else would
    // leave a dangling title in the parents map.
    if !old_state.beliefs.nodes.contains_key(from_node_id) {
        warn!(
            from = from_node_id,
            "link command from a node not in the graph"
        );
        return old_state.clone();
    }
    let Some(child) = old_state.beliefs.nodes.get(to_node_id) else {
        warn!(to = to_node_id, "link command to a node not in the graph");
        return old_state.clone();
    };
    let linkable = child
        .parents()
        .and_then(|parents| parents.get(to_input_id))
        .is_some_and(|parent_ids| !parent_ids.iter().any(|id| id == from_node_id));
    if !linkable {
        return old_state.clone();
    }
    let mut state = old_state.clone();
    if let Some(parent_ids) = state
        .beliefs
        .nodes
        .get_mut(to_node_id)
        .and_then(Node::parents_mut)
        .and_then(|parents| parents.get_mut(to_input_id))
    {
        parent_ids.push(from_node_id.to_string());
    }
    state
}

fn unlink_node(
    old_state: &WorkbenchState,
    from_node_id: &str,
    to_node_id: &str,
    to_input_id: &str,
) -> WorkbenchState {
    let linked = old_state
        .beliefs
        .nodes
        .get(to_node_id)
        .and_then(Node::parents)
        .and_then(|parents| parents.get(to_input_id))
        .is_some_and(|parent_ids| parent_ids.iter().any(|id| id == from_node_id));
    if !linked {
        return old_state.clone();
    }
    let mut state = old_state.clone();
    if let Some(parent_ids) = state
        .beliefs
        .nodes
        .get_mut(to_node_id)
        .and_then(Node::parents_mut)
        .and_then(|parents| parents.get_mut(to_input_id))
    {
        parent_ids.retain(|id| id != from_node_id);
    }
    state
}

fn delete_node(old_state: &WorkbenchState, node_id_to_delete: &str) -> WorkbenchState {
    let mut without_node = old_state.clone();
    without_node.beliefs.nodes.remove(node_id_to_delete);
    map_parents(&without_node, |_node_id, _port_id, parent_ids| {
        parent_ids
            .iter()
            .filter(|id| *id != node_id_to_delete)
            .cloned()
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{DistributionKind, FunctionKind, Nodes, demo_nodes};
    use crate::workbench::Beliefs;
    use std::collections::BTreeMap;

    fn stub_state(nodes: Nodes) -> WorkbenchState {
        WorkbenchState::new(Beliefs {
            nodes,
            language: "en-US".to_string(),
            model_name: "Test model".to_string(),
        })
    }

    fn two_constants() -> WorkbenchState {
        let mut nodes = Nodes::new();
        nodes.insert(
            "Zero".to_string(),
            Node::Constant {
                value: Value::Number(0.0),
                value_type: ExpectedValueType::Number,
                justification: String::new(),
                coords: [100.0, 100.0],
            },
        );
        nodes.insert(
            "One".to_string(),
            Node::Constant {
                value: Value::Number(1.0),
                value_type: ExpectedValueType::Number,
                justification: String::new(),
                coords: [150.0, 100.0],
            },
        );
        stub_state(nodes)
    }

    #[test]
    fn add_node_synthesizes_a_unique_title_and_enters_edit_mode() {
        let state = two_constants();
        let state = reduce(&state, &Command::AddNode);
        let node = &state.beliefs.nodes["Node 1"];
        assert_eq!(
            *node,
            Node::Constant {
                value: Value::Number(0.0),
                value_type: ExpectedValueType::Number,
                justification: String::new(),
                coords: [100.0, 100.0],
            }
        );
        assert_eq!(state.currently_editing.as_deref(), Some("Node 1"));
        assert_eq!(state.new_properties.title, "Node 1");

        // The next probe skips the now-taken title.
        let state = reduce(&state, &Command::AddNode);
        assert!(state.beliefs.nodes.contains_key("Node 2"));
    }

    #[test]
    fn linking_into_a_constant_is_a_no_op() {
        let state = reduce(&two_constants(), &Command::AddNode);
        let linked = reduce(
            &state,
            &Command::LinkNodes {
                from_node_id: "Zero".to_string(),
                to_node_id: "Node 1".to_string(),
                to_input_id: "toAdd".to_string(),
            },
        );
        assert_eq!(linked, state);
    }

    fn with_adder(mut state: WorkbenchState) -> WorkbenchState {
        state.beliefs.nodes.insert(
            "Sum".to_string(),
            Node::Function {
                function: FunctionKind::Add,
                parents: BTreeMap::from([("toAdd".to_string(), Vec::new())]),
                justification: String::new(),
                coords: [200.0, 200.0],
            },
        );
        state
    }

    fn link_zero_to_sum() -> Command {
        Command::LinkNodes {
            from_node_id: "Zero".to_string(),
            to_node_id: "Sum".to_string(),
            to_input_id: "toAdd".to_string(),
        }
    }

    #[test]
    fn linking_is_idempotent() {
        let state = with_adder(two_constants());
        let once = reduce(&state, &link_zero_to_sum());
        assert_eq!(
            once.beliefs.nodes["Sum"].parents().unwrap()["toAdd"],
            vec!["Zero".to_string()]
        );
        let twice = reduce(&once, &link_zero_to_sum());
        assert_eq!(twice, once);
    }

    #[test]
    fn linking_preserves_argument_order() {
        let state = with_adder(two_constants());
        let state = reduce(&state, &link_zero_to_sum());
        let state = reduce(
            &state,
            &Command::LinkNodes {
                from_node_id: "One".to_string(),
                to_node_id: "Sum".to_string(),
                to_input_id: "toAdd".to_string(),
            },
        );
        assert_eq!(
            state.beliefs.nodes["Sum"].parents().unwrap()["toAdd"],
            vec!["Zero".to_string(), "One".to_string()]
        );
    }

    #[test]
    fn linking_from_an_unknown_parent_is_refused() {
        let state = with_adder(two_constants());
        let linked = reduce(
            &state,
            &Command::LinkNodes {
                from_node_id: "Ghost".to_string(),
                to_node_id: "Sum".to_string(),
                to_input_id: "toAdd".to_string(),
            },
        );
        assert_eq!(linked, state);
    }

    #[test]
    fn linking_to_an_unknown_port_is_a_no_op() {
        let state = with_adder(two_constants());
        let linked = reduce(
            &state,
            &Command::LinkNodes {
                from_node_id: "Zero".to_string(),
                to_node_id: "Sum".to_string(),
                to_input_id: "numerator".to_string(),
            },
        );
        assert_eq!(linked, state);
    }

    #[test]
    fn unlinking_a_missing_edge_is_a_no_op() {
        let state = with_adder(two_constants());
        let unlinked = reduce(
            &state,
            &Command::UnlinkNodes {
                from_node_id: "Zero".to_string(),
                to_node_id: "Sum".to_string(),
                to_input_id: "toAdd".to_string(),
            },
        );
        assert_eq!(unlinked, state);
    }

    #[test]
    fn unlinking_removes_exactly_the_named_parent() {
        let state = with_adder(two_constants());
        let state = reduce(&state, &link_zero_to_sum());
        let state = reduce(
            &state,
            &Command::LinkNodes {
                from_node_id: "One".to_string(),
                to_node_id: "Sum".to_string(),
                to_input_id: "toAdd".to_string(),
            },
        );
        let state = reduce(
            &state,
            &Command::UnlinkNodes {
                from_node_id: "Zero".to_string(),
                to_node_id: "Sum".to_string(),
                to_input_id: "toAdd".to_string(),
            },
        );
        assert_eq!(
            state.beliefs.nodes["Sum"].parents().unwrap()["toAdd"],
            vec!["One".to_string()]
        );
    }

    #[test]
    fn deleting_scrubs_every_reference() {
        let state = stub_state(demo_nodes());
        let state = reduce(
            &state,
            &Command::DeleteNode {
                node_id_to_delete: "Zero".to_string(),
            },
        );
        assert!(!state.beliefs.nodes.contains_key("Zero"));
        for node in state.beliefs.nodes.values() {
            let Some(parents) = node.parents() else {
                continue;
            };
            for parent_ids in parents.values() {
                assert!(!parent_ids.iter().any(|id| id == "Zero"));
            }
        }
    }

    #[test]
    fn moving_replaces_coords_only() {
        let state = two_constants();
        let moved = reduce(
            &state,
            &Command::MoveNode {
                node_id: "Zero".to_string(),
                new_coords: [7.0, 11.0],
            },
        );
        assert_eq!(moved.beliefs.nodes["Zero"].coords(), [7.0, 11.0]);
        let mut expectation = state.clone();
        expectation
            .beliefs
            .nodes
            .get_mut("Zero")
            .unwrap()
            .set_coords([7.0, 11.0]);
        assert_eq!(moved, expectation);
    }

    #[test]
    fn renaming_rewrites_every_reference() {
        let state = with_adder(two_constants());
        let state = reduce(&state, &link_zero_to_sum());
        let state = reduce(
            &state,
            &Command::StartEditingNode {
                to_edit: "Zero".to_string(),
            },
        );
        let mut form = state.new_properties.clone();
        form.title = "Nada".to_string();
        let state = reduce(&state, &Command::UpdateEditorState { new_state: form });
        let state = reduce(&state, &Command::FinishEditingNode);
        assert!(state.currently_editing.is_none());
        assert!(!state.beliefs.nodes.contains_key("Zero"));
        assert!(state.beliefs.nodes.contains_key("Nada"));
        assert_eq!(
            state.beliefs.nodes["Sum"].parents().unwrap()["toAdd"],
            vec!["Nada".to_string()]
        );
    }

    #[test]
    fn committing_a_duplicate_title_stays_in_edit_mode() {
        let state = two_constants();
        let state = reduce(
            &state,
            &Command::StartEditingNode {
                to_edit: "Zero".to_string(),
            },
        );
        let mut form = state.new_properties.clone();
        form.title = "One".to_string();
        let state = reduce(&state, &Command::UpdateEditorState { new_state: form });
        let finished = reduce(&state, &Command::FinishEditingNode);
        assert_eq!(finished, state);
        assert_eq!(finished.currently_editing.as_deref(), Some("Zero"));
    }

    #[test]
    fn committing_an_invalid_value_stays_in_edit_mode() {
        let state = two_constants();
        let state = reduce(
            &state,
            &Command::StartEditingNode {
                to_edit: "Zero".to_string(),
            },
        );
        let mut form = state.new_properties.clone();
        form.value = "1 wonky".to_string();
        let state = reduce(&state, &Command::UpdateEditorState { new_state: form });
        let finished = reduce(&state, &Command::FinishEditingNode);
        assert_eq!(finished, state);
    }

    #[test]
    fn changing_the_node_type_drops_port_wiring() {
        let state = with_adder(two_constants());
        let state = reduce(&state, &link_zero_to_sum());
        let state = reduce(
            &state,
            &Command::StartEditingNode {
                to_edit: "Sum".to_string(),
            },
        );
        let mut form = state.new_properties.clone();
        form.node_type = NodeType::Distribution;
        form.distribution = DistributionKind::ContinuousUniform;
        let state = reduce(&state, &Command::UpdateEditorState { new_state: form });
        let state = reduce(&state, &Command::FinishEditingNode);
        let parents = state.beliefs.nodes["Sum"].parents().unwrap();
        assert_eq!(parents.len(), 2);
        assert!(parents["min"].is_empty());
        assert!(parents["max"].is_empty());
    }

    #[test]
    fn finishing_with_a_corrupted_edit_record_cancels_the_edit() {
        let mut state = two_constants();
        state.currently_editing = Some("Ghost".to_string());
        let finished = reduce(&state, &Command::FinishEditingNode);
        assert!(finished.currently_editing.is_none());
        assert_eq!(finished.beliefs, state.beliefs);
    }

    #[test]
    fn editing_preserves_committed_coords() {
        let state = two_constants();
        let state = reduce(
            &state,
            &Command::StartEditingNode {
                to_edit: "One".to_string(),
            },
        );
        let mut form = state.new_properties.clone();
        form.justification = "Still the multiplicative identity".to_string();
        let state = reduce(&state, &Command::UpdateEditorState { new_state: form });
        let state = reduce(&state, &Command::FinishEditingNode);
        assert_eq!(state.beliefs.nodes["One"].coords(), [150.0, 100.0]);
        assert_eq!(
            state.beliefs.nodes["One"].justification(),
            "Still the multiplicative identity"
        );
    }

    #[test]
    fn noop_returns_the_state_unchanged() {
        let state = stub_state(demo_nodes());
        assert_eq!(reduce(&state, &Command::NoOp), state);
    }
}
