use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::nodes::Nodes;
use crate::workbench::Beliefs;

// ------------------------------------------------------------------
// Serialization structures
// ------------------------------------------------------------------

/// On-disk shape of a beliefs document.
#[derive(Serialize, Deserialize)]
pub struct SerializableBeliefs {
    #[serde(rename = "modelName")]
    model_name: String,
    language: String,
    nodes: Nodes,
}

// ------------------------------------------------------------------
// Serialization conversion functions
// ------------------------------------------------------------------

pub fn beliefs_to_serializable(beliefs: &Beliefs) -> SerializableBeliefs {
    SerializableBeliefs {
        model_name: beliefs.model_name.clone(),
        language: beliefs.language.clone(),
        nodes: beliefs.nodes.clone(),
    }
}

pub fn serializable_to_beliefs(serializable: SerializableBeliefs) -> Beliefs {
    Beliefs {
        nodes: serializable.nodes,
        language: serializable.language,
        model_name: serializable.model_name,
    }
}

// ------------------------------------------------------------------
// File I/O operations
// ------------------------------------------------------------------

pub fn save_to_file(beliefs: &Beliefs, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(&beliefs_to_serializable(beliefs))
        .map_err(|e| format!("Failed to serialize beliefs: {}", e))?;

    std::fs::write(path, json)
        .map_err(|e| format!("Failed to write file: {}", e))?;

    Ok(())
}

pub fn load_from_file(path: &Path) -> Result<Beliefs, String> {
    let json_str = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file: {}", e))?;

    let serializable: SerializableBeliefs = serde_json::from_str(&json_str)
        .map_err(|e| format!("Failed to parse JSON: {}", e))?;

    Ok(serializable_to_beliefs(serializable))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{ExpectedValueType, Node, Value, demo_nodes};

    fn demo_beliefs() -> Beliefs {
        Beliefs {
            nodes: demo_nodes(),
            language: "en-US".to_string(),
            model_name: "Demo Model".to_string(),
        }
    }

    #[test]
    fn beliefs_survive_a_json_round_trip() {
        let beliefs = demo_beliefs();
        let json =
            serde_json::to_string_pretty(&beliefs_to_serializable(&beliefs)).unwrap();
        let parsed: SerializableBeliefs = serde_json::from_str(&json).unwrap();
        assert_eq!(serializable_to_beliefs(parsed), beliefs);
    }

    #[test]
    fn parses_documents_without_an_explicit_value_type() {
        // Older documents wrote constants without a valueType field.
        let json = r#"{
            "modelName": "Legacy",
            "language": "en-US",
            "nodes": {
                "Zero": {
                    "type": "ConstantNode",
                    "justification": "Additive identity",
                    "coords": [100, 100],
                    "value": 0
                }
            }
        }"#;
        let parsed: SerializableBeliefs = serde_json::from_str(json).unwrap();
        let beliefs = serializable_to_beliefs(parsed);
        assert_eq!(
            beliefs.nodes["Zero"],
            Node::Constant {
                value: Value::Number(0.0),
                value_type: ExpectedValueType::Number,
                justification: "Additive identity".to_string(),
                coords: [100.0, 100.0],
            }
        );
    }

    #[test]
    fn node_kind_tags_use_their_document_names() {
        let json =
            serde_json::to_string(&beliefs_to_serializable(&demo_beliefs())).unwrap();
        assert!(json.contains("\"ConstantNode\""));
        assert!(json.contains("\"DistributionNode\""));
        assert!(json.contains("\"ContinuousUniform\""));
    }
}
