// The closed command vocabulary a collaborating UI can issue

use crate::editor_state::EditorState;

/// Commands dispatched against the workbench state. Every command is applied
/// by a pure reducer; see `reducers::reduce`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Do nothing; kept as the explicit forward-compatible no-op.
    NoOp,
    /// Insert a default constant node under a fresh title and start editing it.
    AddNode,
    /// Open the edit form for an existing node.
    StartEditingNode { to_edit: String },
    /// Discard the edit form; the committed graph is untouched.
    CancelEditingNode,
    /// Validate and commit the edit form to the graph.
    FinishEditingNode,
    /// Replace the edit form state wholesale (issued on every form change).
    UpdateEditorState { new_state: EditorState },
    /// Replace a node's canvas coordinates.
    MoveNode {
        node_id: String,
        new_coords: [f64; 2],
    },
    /// Append a parent to a node's named input port.
    LinkNodes {
        /// The node at whose output the link starts.
        from_node_id: String,
        /// The node at whose input the link terminates.
        to_node_id: String,
        /// The input port at which the link terminates.
        to_input_id: String,
    },
    /// Remove a parent from a node's named input port.
    UnlinkNodes {
        from_node_id: String,
        to_node_id: String,
        to_input_id: String,
    },
    /// Remove a node and scrub every reference to it.
    DeleteNode { node_id_to_delete: String },
}
