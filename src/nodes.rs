// Belief network data model - node variants, parents maps, primitive values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The primitive types of the belief workbench graph language, as declared
/// by the property catalogs for node input ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Bool,
    Int,
    Double,
    String,
    Array,
}

/// A constant or constraint value: a boolean, a finite number, a string, or
/// an arbitrarily nested list of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// Render the value the way the editor form displays it: numbers and
    /// strings verbatim, everything else as JSON.
    pub fn to_editor_string(&self) -> String {
        match self {
            Value::Number(n) => format!("{}", n),
            Value::Text(s) => s.clone(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}

/// The value type a constant or constraint node expects its raw text to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExpectedValueType {
    #[default]
    Number,
    Text,
    List,
}

impl ExpectedValueType {
    pub const ALL: [ExpectedValueType; 3] = [
        ExpectedValueType::Number,
        ExpectedValueType::Text,
        ExpectedValueType::List,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExpectedValueType::Number => "Number",
            ExpectedValueType::Text => "Text",
            ExpectedValueType::List => "List",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionKind {
    ContinuousUniform,
    DiscreteUniform,
}

impl DistributionKind {
    pub const ALL: [DistributionKind; 2] = [
        DistributionKind::ContinuousUniform,
        DistributionKind::DiscreteUniform,
    ];
}

/// Deterministic functions a function node can apply to its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionKind {
    Add,
    Multiply,
    Divide,
    Round,
    Ceil,
    Floor,
    AreEqual,
    MakeArray,
    ConcatArrays,
    ArrayElement,
    ArrayLength,
    IntRange,
}

impl FunctionKind {
    pub const ALL: [FunctionKind; 12] = [
        FunctionKind::Add,
        FunctionKind::Multiply,
        FunctionKind::Divide,
        FunctionKind::Round,
        FunctionKind::Ceil,
        FunctionKind::Floor,
        FunctionKind::AreEqual,
        FunctionKind::MakeArray,
        FunctionKind::ConcatArrays,
        FunctionKind::ArrayElement,
        FunctionKind::ArrayLength,
        FunctionKind::IntRange,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualizationKind {
    #[serde(rename = "1DHistogram")]
    Histogram1D,
    #[serde(rename = "2DColorForProbability")]
    ColorForProbability2D,
}

impl VisualizationKind {
    pub const ALL: [VisualizationKind; 2] = [
        VisualizationKind::Histogram1D,
        VisualizationKind::ColorForProbability2D,
    ];
}

/// The five node variants, used by the editor form to select a target shape
/// before a committed `Node` exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "DistributionNode")]
    Distribution,
    #[serde(rename = "FunctionNode")]
    Function,
    #[serde(rename = "ConstantNode")]
    Constant,
    #[serde(rename = "ConstraintNode")]
    Constraint,
    #[serde(rename = "VisualizationNode")]
    Visualization,
}

impl NodeType {
    pub const ALL: [NodeType; 5] = [
        NodeType::Distribution,
        NodeType::Function,
        NodeType::Constant,
        NodeType::Constraint,
        NodeType::Visualization,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NodeType::Distribution => "Distribution",
            NodeType::Function => "Function",
            NodeType::Constant => "Constant",
            NodeType::Constraint => "Constraint",
            NodeType::Visualization => "Visualization",
        }
    }

    /// Whether nodes of this type carry a parents map.
    pub fn has_parents(&self) -> bool {
        *self != NodeType::Constant
    }

    /// Whether nodes of this type carry a raw value edited as text.
    pub fn has_value_field(&self) -> bool {
        matches!(self, NodeType::Constant | NodeType::Constraint)
    }
}

/// Parent references per input port: port name -> ordered parent titles.
/// Order is argument order; a port may list several parents.
pub type Parents = BTreeMap<String, Vec<String>>;

/// One vertex of the belief graph. The unique title string is the key in
/// the `Nodes` map, not a field of the node itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    #[serde(rename = "DistributionNode")]
    Distribution {
        distribution: DistributionKind,
        parents: Parents,
        justification: String,
        coords: [f64; 2],
    },
    #[serde(rename = "FunctionNode")]
    Function {
        function: FunctionKind,
        parents: Parents,
        justification: String,
        coords: [f64; 2],
    },
    #[serde(rename = "ConstantNode")]
    Constant {
        value: Value,
        #[serde(rename = "valueType", default)]
        value_type: ExpectedValueType,
        justification: String,
        coords: [f64; 2],
    },
    #[serde(rename = "ConstraintNode")]
    Constraint {
        value: Value,
        #[serde(rename = "valueType", default)]
        value_type: ExpectedValueType,
        parents: Parents,
        justification: String,
        coords: [f64; 2],
    },
    #[serde(rename = "VisualizationNode")]
    Visualization {
        visualization: VisualizationKind,
        parents: Parents,
        justification: String,
        coords: [f64; 2],
    },
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Distribution { .. } => NodeType::Distribution,
            Node::Function { .. } => NodeType::Function,
            Node::Constant { .. } => NodeType::Constant,
            Node::Constraint { .. } => NodeType::Constraint,
            Node::Visualization { .. } => NodeType::Visualization,
        }
    }

    pub fn coords(&self) -> [f64; 2] {
        match self {
            Node::Distribution { coords, .. }
            | Node::Function { coords, .. }
            | Node::Constant { coords, .. }
            | Node::Constraint { coords, .. }
            | Node::Visualization { coords, .. } => *coords,
        }
    }

    pub fn set_coords(&mut self, new_coords: [f64; 2]) {
        match self {
            Node::Distribution { coords, .. }
            | Node::Function { coords, .. }
            | Node::Constant { coords, .. }
            | Node::Constraint { coords, .. }
            | Node::Visualization { coords, .. } => *coords = new_coords,
        }
    }

    pub fn justification(&self) -> &str {
        match self {
            Node::Distribution { justification, .. }
            | Node::Function { justification, .. }
            | Node::Constant { justification, .. }
            | Node::Constraint { justification, .. }
            | Node::Visualization { justification, .. } => justification,
        }
    }

    /// The parents map, absent for constant nodes.
    pub fn parents(&self) -> Option<&Parents> {
        match self {
            Node::Distribution { parents, .. }
            | Node::Function { parents, .. }
            | Node::Constraint { parents, .. }
            | Node::Visualization { parents, .. } => Some(parents),
            Node::Constant { .. } => None,
        }
    }

    pub fn parents_mut(&mut self) -> Option<&mut Parents> {
        match self {
            Node::Distribution { parents, .. }
            | Node::Function { parents, .. }
            | Node::Constraint { parents, .. }
            | Node::Visualization { parents, .. } => Some(parents),
            Node::Constant { .. } => None,
        }
    }
}

/// The whole graph: title -> node. Every title appearing in any parents
/// entry should name a key of this map.
pub type Nodes = BTreeMap<String, Node>;

/// The startup graph: a handful of constants feeding two distributions.
pub fn demo_nodes() -> Nodes {
    let mut nodes = Nodes::new();
    nodes.insert(
        "Zero".to_string(),
        Node::Constant {
            value: Value::Number(0.0),
            value_type: ExpectedValueType::Number,
            justification: "We needed a zero constant".to_string(),
            coords: [100.0, 100.0],
        },
    );
    nodes.insert(
        "One".to_string(),
        Node::Constant {
            value: Value::Number(1.0),
            value_type: ExpectedValueType::Number,
            justification: "We needed a one constant".to_string(),
            coords: [150.0, 100.0],
        },
    );
    nodes.insert(
        "Primes".to_string(),
        Node::Constant {
            value: Value::List(
                [2.0, 3.0, 5.0, 7.0, 11.0, 13.0, 17.0, 19.0]
                    .iter()
                    .map(|&p| Value::Number(p))
                    .collect(),
            ),
            value_type: ExpectedValueType::List,
            justification: "List of the smallest primes".to_string(),
            coords: [250.0, 100.0],
        },
    );
    nodes.insert(
        "A number between zero and one".to_string(),
        Node::Distribution {
            distribution: DistributionKind::ContinuousUniform,
            parents: BTreeMap::from([
                ("min".to_string(), vec!["Zero".to_string()]),
                ("max".to_string(), vec!["One".to_string()]),
            ]),
            justification: "A reason for this node".to_string(),
            coords: [100.0, 200.0],
        },
    );
    nodes.insert(
        "A random small prime".to_string(),
        Node::Distribution {
            distribution: DistributionKind::DiscreteUniform,
            parents: BTreeMap::from([(
                "choices".to_string(),
                vec!["Primes".to_string()],
            )]),
            justification: "This is the output of the prime generator".to_string(),
            coords: [200.0, 200.0],
        },
    );
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_nodes_have_no_parents() {
        let nodes = demo_nodes();
        assert!(nodes["Zero"].parents().is_none());
        assert!(!NodeType::Constant.has_parents());
    }

    #[test]
    fn demo_graph_references_resolve() {
        let nodes = demo_nodes();
        for node in nodes.values() {
            let Some(parents) = node.parents() else {
                continue;
            };
            for parent_ids in parents.values() {
                for id in parent_ids {
                    assert!(nodes.contains_key(id), "dangling parent {:?}", id);
                }
            }
        }
    }

    #[test]
    fn editor_string_renders_numbers_plainly() {
        assert_eq!(Value::Number(0.0).to_editor_string(), "0");
        assert_eq!(Value::Number(7.5).to_editor_string(), "7.5");
        assert_eq!(Value::Text("abc".into()).to_editor_string(), "abc");
        assert_eq!(
            Value::List(vec![Value::Number(1.0), Value::Text("one".into())])
                .to_editor_string(),
            "[1.0,\"one\"]"
        );
    }
}
