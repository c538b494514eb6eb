// Property catalogs - per-kind display names and declared input ports

use crate::nodes::{
    DistributionKind, FunctionKind, NodeType, Parents, PrimitiveType, VisualizationKind,
};
use tracing::{error, warn};

/// Static description of one node kind: its display name and the input
/// ports it declares, in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct TypeProperties {
    pub name: &'static str,
    pub inputs: &'static [(&'static str, PrimitiveType)],
}

pub fn distribution_props(kind: DistributionKind) -> &'static TypeProperties {
    match kind {
        DistributionKind::DiscreteUniform => &TypeProperties {
            name: "Discrete Uniform Choice",
            inputs: &[("choices", PrimitiveType::Array)],
        },
        DistributionKind::ContinuousUniform => &TypeProperties {
            name: "Continuous Uniform",
            inputs: &[("min", PrimitiveType::Double), ("max", PrimitiveType::Double)],
        },
    }
}

pub fn function_props(kind: FunctionKind) -> &'static TypeProperties {
    match kind {
        FunctionKind::Add => &TypeProperties {
            name: "Add",
            inputs: &[("toAdd", PrimitiveType::Array)],
        },
        FunctionKind::Multiply => &TypeProperties {
            name: "Multiply",
            inputs: &[("toMultiply", PrimitiveType::Array)],
        },
        FunctionKind::Divide => &TypeProperties {
            name: "Divide",
            inputs: &[
                ("numerator", PrimitiveType::Array),
                ("denominator", PrimitiveType::Double),
            ],
        },
        FunctionKind::Round => &TypeProperties {
            name: "Round",
            inputs: &[("toRound", PrimitiveType::Array)],
        },
        FunctionKind::Ceil => &TypeProperties {
            name: "Ceil",
            inputs: &[("toCeil", PrimitiveType::Array)],
        },
        FunctionKind::Floor => &TypeProperties {
            name: "Floor",
            inputs: &[("toFloor", PrimitiveType::Array)],
        },
        FunctionKind::AreEqual => &TypeProperties {
            name: "Are Equal",
            inputs: &[("toCheck", PrimitiveType::Array)],
        },
        FunctionKind::MakeArray => &TypeProperties {
            name: "Make Array",
            inputs: &[("toCombine", PrimitiveType::Array)],
        },
        FunctionKind::ConcatArrays => &TypeProperties {
            name: "Concatenate Arrays",
            inputs: &[("toConcat", PrimitiveType::Array)],
        },
        FunctionKind::ArrayElement => &TypeProperties {
            name: "Array Element",
            inputs: &[("array", PrimitiveType::Array), ("index", PrimitiveType::Int)],
        },
        FunctionKind::ArrayLength => &TypeProperties {
            name: "Array Length",
            inputs: &[("array", PrimitiveType::Array)],
        },
        FunctionKind::IntRange => &TypeProperties {
            name: "Integer Range",
            inputs: &[
                ("first", PrimitiveType::Int),
                ("size", PrimitiveType::Int),
                ("step", PrimitiveType::Int),
            ],
        },
    }
}

pub fn visualization_props(kind: VisualizationKind) -> &'static TypeProperties {
    match kind {
        VisualizationKind::Histogram1D => &TypeProperties {
            name: "1-D Histogram",
            inputs: &[("variables", PrimitiveType::Array)],
        },
        VisualizationKind::ColorForProbability2D => &TypeProperties {
            name: "2-D Color for Probability",
            inputs: &[
                ("variable1", PrimitiveType::Array),
                ("variable2", PrimitiveType::Array),
            ],
        },
    }
}

/// The single synthetic input port every constraint node exposes.
pub const CONSTRAINT_PORT: &str = "toConstrain";

fn empty_parents_from_props(props: &TypeProperties) -> Parents {
    props
        .inputs
        .iter()
        .map(|(input_name, _)| (input_name.to_string(), Vec::new()))
        .collect()
}

/// The empty parents skeleton for a node of the given type and kind: one
/// entry per declared input port, each with no parents yet.
///
/// Constant nodes have no ports; asking for them is a caller bug, reported
/// and answered with an empty map.
pub fn empty_parents(
    node_type: NodeType,
    distribution: DistributionKind,
    function: FunctionKind,
    visualization: VisualizationKind,
) -> Parents {
    match node_type {
        NodeType::Function => empty_parents_from_props(function_props(function)),
        NodeType::Constant => {
            error!("empty_parents called for a constant node (they do not have parents)");
            Parents::new()
        }
        NodeType::Constraint => Parents::from([(CONSTRAINT_PORT.to_string(), Vec::new())]),
        NodeType::Visualization => {
            empty_parents_from_props(visualization_props(visualization))
        }
        NodeType::Distribution => {
            empty_parents_from_props(distribution_props(distribution))
        }
    }
}

/// Display subtitle for a node kind, shown under the title on the canvas.
pub fn kind_subtitle(node: &crate::nodes::Node) -> String {
    use crate::nodes::Node;
    match node {
        Node::Distribution { distribution, .. } => {
            format!("Distribution: {}", distribution_props(*distribution).name)
        }
        Node::Function { function, .. } => {
            format!("Function: {}", function_props(*function).name)
        }
        Node::Constant { value, .. } => {
            format!("Constant: {}", value.to_editor_string())
        }
        Node::Constraint { value, .. } => {
            format!("Constraint: {}", value.to_editor_string())
        }
        Node::Visualization { visualization, .. } => {
            format!("Visualization: {}", visualization_props(*visualization).name)
        }
    }
}

/// Port names declared for a committed node, in catalog order.
pub fn declared_inputs(node: &crate::nodes::Node) -> Vec<String> {
    use crate::nodes::Node;
    match node {
        Node::Distribution { distribution, .. } => distribution_props(*distribution)
            .inputs
            .iter()
            .map(|(name, _)| name.to_string())
            .collect(),
        Node::Function { function, .. } => function_props(*function)
            .inputs
            .iter()
            .map(|(name, _)| name.to_string())
            .collect(),
        Node::Constant { .. } => {
            warn!("declared_inputs called for a constant node");
            Vec::new()
        }
        Node::Constraint { .. } => vec![CONSTRAINT_PORT.to_string()],
        Node::Visualization { visualization, .. } => visualization_props(*visualization)
            .inputs
            .iter()
            .map(|(name, _)| name.to_string())
            .collect(),
    }
}
