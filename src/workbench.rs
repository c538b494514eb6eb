// Workbench state - the single immutable application snapshot

use crate::editor_state::EditorState;
use crate::nodes::Nodes;

/// The beliefs document being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Beliefs {
    pub nodes: Nodes,
    pub language: String,
    pub model_name: String,
}

/// Process-wide application state. Every command produces a fresh value via
/// the reducer; no transition mutates the previous snapshot in place.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbenchState {
    pub beliefs: Beliefs,
    /// Title of the node currently being edited, or `None` in graph view.
    pub currently_editing: Option<String>,
    /// The edit form state for the node being edited.
    pub new_properties: EditorState,
    /// The URL for storing the current beliefs.
    pub current_url: Option<String>,
}

impl WorkbenchState {
    pub fn new(beliefs: Beliefs) -> Self {
        Self {
            beliefs,
            currently_editing: None,
            new_properties: EditorState::default(),
            current_url: None,
        }
    }
}

/// Map over every port of every node, replacing each port's parent list with
/// the callback's result. Nodes without parents pass through untouched; the
/// input state is never modified.
pub fn map_parents(
    old_state: &WorkbenchState,
    callback: impl Fn(&str, &str, &[String]) -> Vec<String>,
) -> WorkbenchState {
    let nodes = old_state
        .beliefs
        .nodes
        .iter()
        .map(|(node_id, node)| {
            let mut node = node.clone();
            if let Some(parents) = node.parents_mut() {
                for (port_id, parent_ids) in parents.iter_mut() {
                    *parent_ids = callback(node_id, port_id, parent_ids);
                }
            }
            (node_id.clone(), node)
        })
        .collect();
    WorkbenchState {
        beliefs: Beliefs {
            nodes,
            ..old_state.beliefs.clone()
        },
        ..old_state.clone()
    }
}
