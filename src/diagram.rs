// Diagram schema - the flat node/port/link shape a rendering widget consumes

use crate::catalog::{declared_inputs, kind_subtitle};
use crate::commands::Command;
use crate::nodes::Nodes;
use std::collections::BTreeSet;
use tracing::warn;

/// One port of a diagram node, keyed by its synthetic string id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramPort {
    pub id: String,
    pub label: String,
}

/// One node of the diagram: a stable id, a position, a content block, input
/// ports in catalog order and exactly one output port.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    pub id: String,
    pub coords: [f64; 2],
    pub title: String,
    pub subtitle: String,
    pub input_ports: Vec<DiagramPort>,
    pub output_port: DiagramPort,
}

/// A raw widget-level link between two port id strings. The widget does not
/// orient its links; either end may be an input or an output port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramLink {
    pub from_port: String,
    pub to_port: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiagramModel {
    pub nodes: Vec<DiagramNode>,
    pub links: Vec<DiagramLink>,
}

// ---------------------------------------------------------------------------
// Port id codec
// ---------------------------------------------------------------------------

// Titles and port names may themselves contain ':' or '%', so both are
// percent-encoded before joining with the fixed delimiters. The encoded
// pieces then cannot contain ':' and a plain split is unambiguous.

pub fn encode_input_port(title: &str, port: &str) -> String {
    format!(
        "{}:input:{}",
        urlencoding::encode(title),
        urlencoding::encode(port)
    )
}

pub fn encode_output_port(title: &str) -> String {
    format!("{}:output", urlencoding::encode(title))
}

/// A decoded port reference. Inside the crate ports are structured values;
/// the synthetic strings exist only at the widget boundary.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PortRef {
    Input { node_id: String, input_id: String },
    Output { node_id: String },
}

#[derive(thiserror::Error, Debug)]
pub enum LinkDecodeError {
    #[error("port id \"{0}\" matches neither the input nor the output shape")]
    BadShape(String),
    #[error("port id \"{0}\" contains invalid percent-encoded text")]
    BadEncoding(String),
    #[error("link does not connect exactly one output to one input")]
    NotOriented,
}

pub fn decode_port(port_id: &str) -> Result<PortRef, LinkDecodeError> {
    let decode = |piece: &str| {
        urlencoding::decode(piece)
            .map(|decoded| decoded.into_owned())
            .map_err(|_| LinkDecodeError::BadEncoding(port_id.to_string()))
    };
    let parts: Vec<&str> = port_id.split(':').collect();
    match parts.as_slice() {
        [title, "input", port] => Ok(PortRef::Input {
            node_id: decode(title)?,
            input_id: decode(port)?,
        }),
        [title, "output"] => Ok(PortRef::Output {
            node_id: decode(title)?,
        }),
        _ => Err(LinkDecodeError::BadShape(port_id.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Forward mapping
// ---------------------------------------------------------------------------

/// Translate the committed graph into the widget schema: one diagram node per
/// graph node and one link per (child, port, listed parent).
pub fn diagram_model(nodes: &Nodes) -> DiagramModel {
    let diagram_nodes = nodes
        .iter()
        .map(|(title, node)| DiagramNode {
            id: title.clone(),
            coords: node.coords(),
            title: title.clone(),
            subtitle: kind_subtitle(node),
            input_ports: declared_inputs(node)
                .iter()
                .map(|port| DiagramPort {
                    id: encode_input_port(title, port),
                    label: port.clone(),
                })
                .collect(),
            output_port: DiagramPort {
                id: encode_output_port(title),
                label: "Out".to_string(),
            },
        })
        .collect();

    let mut links = Vec::new();
    for (title, node) in nodes {
        let Some(parents) = node.parents() else {
            continue;
        };
        for (port, parent_ids) in parents {
            for parent_id in parent_ids {
                links.push(DiagramLink {
                    from_port: encode_output_port(parent_id),
                    to_port: encode_input_port(title, port),
                    // A port fed by several parents needs the name to tell
                    // its links apart.
                    label: if parent_ids.len() > 1 {
                        parent_id.clone()
                    } else {
                        String::new()
                    },
                });
            }
        }
    }
    DiagramModel {
        nodes: diagram_nodes,
        links,
    }
}

// ---------------------------------------------------------------------------
// Reverse mapping
// ---------------------------------------------------------------------------

/// A structurally comparable link: source node, destination node, destination
/// input port. This is the identity used for the before/after set difference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LinkTriple {
    pub from_node_id: String,
    pub to_node_id: String,
    pub to_input_id: String,
}

/// Orient one raw widget link. The user may have dragged in either direction,
/// so classify both ends first; a link with zero or two output ends carries
/// no usable structure.
fn orient_link(link: &DiagramLink) -> Result<LinkTriple, LinkDecodeError> {
    let ends = (decode_port(&link.from_port)?, decode_port(&link.to_port)?);
    match ends {
        (
            PortRef::Output { node_id: from },
            PortRef::Input {
                node_id: to,
                input_id,
            },
        )
        | (
            PortRef::Input {
                node_id: to,
                input_id,
            },
            PortRef::Output { node_id: from },
        ) => Ok(LinkTriple {
            from_node_id: from,
            to_node_id: to,
            to_input_id: input_id,
        }),
        _ => Err(LinkDecodeError::NotOriented),
    }
}

/// The set of well-formed oriented links in a diagram model. Malformed links
/// are dropped with a warning; they must not corrupt the rest of the graph.
pub fn link_triples(model: &DiagramModel) -> BTreeSet<LinkTriple> {
    let mut triples = BTreeSet::new();
    for link in &model.links {
        match orient_link(link) {
            Ok(triple) => {
                triples.insert(triple);
            }
            Err(e) => warn!(
                from = %link.from_port,
                to = %link.to_port,
                "dropping malformed diagram link: {}",
                e
            ),
        }
    }
    triples
}

/// Decode a widget edit (the schema before and after the gesture) into the
/// commands that reproduce it on the graph: moves for changed coordinates,
/// links for added triples, unlinks for removed ones.
pub fn diagram_changes(before: &DiagramModel, after: &DiagramModel) -> Vec<Command> {
    let mut commands = Vec::new();

    for old_node in &before.nodes {
        if let Some(new_node) = after.nodes.iter().find(|n| n.id == old_node.id)
            && new_node.coords != old_node.coords
        {
            commands.push(Command::MoveNode {
                node_id: old_node.id.clone(),
                new_coords: new_node.coords,
            });
        }
    }

    let old_links = link_triples(before);
    let new_links = link_triples(after);
    for added in new_links.difference(&old_links) {
        commands.push(Command::LinkNodes {
            from_node_id: added.from_node_id.clone(),
            to_node_id: added.to_node_id.clone(),
            to_input_id: added.to_input_id.clone(),
        });
    }
    for removed in old_links.difference(&new_links) {
        commands.push(Command::UnlinkNodes {
            from_node_id: removed.from_node_id.clone(),
            to_node_id: removed.to_node_id.clone(),
            to_input_id: removed.to_input_id.clone(),
        });
    }
    commands
}
