// Node editor form state and validation of typed-in values

use crate::nodes::{
    DistributionKind, ExpectedValueType, FunctionKind, Node, NodeType, Value,
    VisualizationKind,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// The state of the node editor form: everything the user can type or pick
/// while editing one node, not yet committed to the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub title: String,
    pub justification: String,
    pub node_type: NodeType,
    pub distribution: DistributionKind,
    pub function: FunctionKind,
    pub visualization: VisualizationKind,
    pub value_type: ExpectedValueType,
    /// Raw value text as typed; parsed on commit.
    pub value: String,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            title: String::new(),
            justification: String::new(),
            node_type: NodeType::Constant,
            distribution: DistributionKind::DiscreteUniform,
            function: FunctionKind::Add,
            visualization: VisualizationKind::Histogram1D,
            value_type: ExpectedValueType::Number,
            value: "0".to_string(),
        }
    }
}

/// Project a committed node into the form state used to edit it. Fields for
/// the other node types keep their defaults.
pub fn editor_properties(node: &Node) -> EditorState {
    let base = EditorState {
        node_type: node.node_type(),
        justification: node.justification().to_string(),
        ..EditorState::default()
    };
    match node {
        Node::Distribution { distribution, .. } => EditorState {
            distribution: *distribution,
            ..base
        },
        Node::Function { function, .. } => EditorState {
            function: *function,
            ..base
        },
        Node::Constant {
            value, value_type, ..
        }
        | Node::Constraint {
            value, value_type, ..
        } => EditorState {
            value_type: *value_type,
            value: value.to_editor_string(),
            ..base
        },
        Node::Visualization { visualization, .. } => EditorState {
            visualization: *visualization,
            ..base
        },
    }
}

/// Outcome of validating a raw value string against an expected type.
#[derive(Debug, Clone)]
pub struct ValueCheck {
    pub is_valid: bool,
    /// The parsed value when valid; a placeholder otherwise.
    pub parsed_value: Value,
    pub messages: Vec<String>,
}

/// Outcome of a title or whole-form validation.
#[derive(Debug, Clone)]
pub struct Validity {
    pub is_valid: bool,
    pub messages: Vec<String>,
}

// Optional sign, digits with optional fraction (or bare fraction), optional
// exponent with mandatory digits. Stricter than f64::from_str, which accepts
// "inf" and "NaN".
static NUMBER_GRAMMAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$")
        .expect("number grammar regex is valid")
});

fn check_number(text: &str) -> ValueCheck {
    let trimmed = text.trim();
    if !NUMBER_GRAMMAR.is_match(trimmed) {
        return ValueCheck {
            is_valid: false,
            parsed_value: Value::Number(0.0),
            messages: vec![format!("\"{}\" is not a number", text)],
        };
    }
    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => ValueCheck {
            is_valid: true,
            parsed_value: Value::Number(parsed),
            messages: Vec::new(),
        },
        _ => ValueCheck {
            is_valid: false,
            parsed_value: Value::Number(0.0),
            messages: vec![format!("\"{}\" is not a finite number", text)],
        },
    }
}

fn json_to_list_value(json: &serde_json::Value) -> Result<Value, String> {
    match json {
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .map(Value::Number)
            .ok_or_else(|| format!("{} is not a finite number", n)),
        serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
        serde_json::Value::Array(items) => items
            .iter()
            .map(json_to_list_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        serde_json::Value::Null => Err("null is not a list element".to_string()),
        serde_json::Value::Object(_) => {
            Err("objects are not list elements".to_string())
        }
    }
}

fn check_list(text: &str) -> ValueCheck {
    let trimmed = text.trim();
    // Bare comma-separated values are accepted by wrapping them in brackets;
    // anything already starting with '[' must be well formed on its own.
    let wrapped;
    let candidate = if trimmed.starts_with('[') {
        trimmed
    } else {
        wrapped = format!("[{}]", trimmed);
        &wrapped
    };
    let parsed: serde_json::Value = match serde_json::from_str(candidate) {
        Ok(v) => v,
        Err(e) => {
            return ValueCheck {
                is_valid: false,
                parsed_value: Value::List(Vec::new()),
                messages: vec![format!("\"{}\" is not a list: {}", text, e)],
            };
        }
    };
    if !parsed.is_array() {
        return ValueCheck {
            is_valid: false,
            parsed_value: Value::List(Vec::new()),
            messages: vec![format!("\"{}\" is not a list", text)],
        };
    }
    match json_to_list_value(&parsed) {
        Ok(value) => ValueCheck {
            is_valid: true,
            parsed_value: value,
            messages: Vec::new(),
        },
        Err(message) => ValueCheck {
            is_valid: false,
            parsed_value: Value::List(Vec::new()),
            messages: vec![format!("\"{}\" is not a list: {}", text, message)],
        },
    }
}

/// Decide whether `text` is a legal value of the expected type, and parse it
/// when it is. Pure; no side effects.
pub fn check_constant_value(text: &str, expected: ExpectedValueType) -> ValueCheck {
    match expected {
        ExpectedValueType::Number => check_number(text),
        ExpectedValueType::Text => ValueCheck {
            is_valid: true,
            parsed_value: Value::Text(text.to_string()),
            messages: Vec::new(),
        },
        ExpectedValueType::List => check_list(text),
    }
}

/// A candidate title is rejected only when it differs from the original and
/// collides with another node's title; keeping the old title is always fine.
pub fn check_title<S: AsRef<str>>(
    all_titles: &[S],
    original_title: &str,
    candidate_title: &str,
) -> Validity {
    let collides = candidate_title != original_title
        && all_titles.iter().any(|t| t.as_ref() == candidate_title);
    if collides {
        Validity {
            is_valid: false,
            messages: vec![format!(
                "There is already a node titled \"{}\"",
                candidate_title
            )],
        }
    } else {
        Validity {
            is_valid: true,
            messages: Vec::new(),
        }
    }
}

/// Validate the whole form: the title check plus, for value-bearing node
/// types, the value check. Validities combine by conjunction, messages by
/// concatenation.
pub fn check_editor_state<S: AsRef<str>>(
    all_titles: &[S],
    original_title: &str,
    state: &EditorState,
) -> Validity {
    let title = check_title(all_titles, original_title, &state.title);
    let mut is_valid = title.is_valid;
    let mut messages = title.messages;
    if state.node_type.has_value_field() {
        let value = check_constant_value(&state.value, state.value_type);
        is_valid = is_valid && value.is_valid;
        messages.extend(value.messages);
    }
    Validity { is_valid, messages }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid_value(value: &str, expected: ExpectedValueType) -> bool {
        check_constant_value(value, expected).is_valid
    }

    #[test]
    fn accepts_normal_numbers_as_numbers() {
        for text in [
            "0", "2", " 2 ", "+1", "-0", "-7", "-7.5", "7.5e2", "7.5e+2", "7.5e-2",
            "75e+2", "75e-2",
        ] {
            assert!(
                is_valid_value(text, ExpectedValueType::Number),
                "expected {:?} to be a valid Number",
                text
            );
        }
    }

    #[test]
    fn rejects_the_empty_string_as_a_number() {
        assert!(!is_valid_value("", ExpectedValueType::Number));
    }

    #[test]
    fn rejects_nan_and_infinity_as_a_number() {
        for text in ["Nan", "nan", "NaN", "Infinity", "infinity", "inf"] {
            assert!(
                !is_valid_value(text, ExpectedValueType::Number),
                "expected {:?} to be rejected as a Number",
                text
            );
        }
    }

    #[test]
    fn rejects_other_json_as_a_number() {
        assert!(!is_valid_value("[1,2,3]", ExpectedValueType::Number));
        assert!(!is_valid_value("{velma: 3}", ExpectedValueType::Number));
        assert!(!is_valid_value("schnoz-berry", ExpectedValueType::Number));
        assert!(!is_valid_value("null", ExpectedValueType::Number));
    }

    #[test]
    fn rejects_strings_starting_with_numbers_as_a_number() {
        for text in ["1 wonky", "2ugly", "3.1.3", "75e+"] {
            assert!(
                !is_valid_value(text, ExpectedValueType::Number),
                "expected {:?} to be rejected as a Number",
                text
            );
        }
    }

    #[test]
    fn parses_scientific_notation() {
        let check = check_constant_value("7.5e-2", ExpectedValueType::Number);
        assert!(check.is_valid);
        assert_eq!(check.parsed_value, Value::Number(0.075));
    }

    #[test]
    fn accepts_lists_as_lists() {
        for text in [
            "[1,2,3]",
            "1,2,3",
            "[1]",
            "[]",
            " [] ",
            " ",
            "1",
            "\"one\"",
            "\"1\", \"two\", 3",
            "[[1,2,3]]",
            "[1,\"two\",3]",
        ] {
            assert!(
                is_valid_value(text, ExpectedValueType::List),
                "expected {:?} to be a valid List",
                text
            );
        }
    }

    #[test]
    fn accepts_nested_lists_as_lists() {
        assert!(is_valid_value("[[1,2,3]]", ExpectedValueType::List));
        assert!(is_valid_value("[[1,\"one\"],[3, \"three\"]]", ExpectedValueType::List));
        assert!(is_valid_value("[[1,\"one\"],[\"three\", 3]]", ExpectedValueType::List));
    }

    #[test]
    fn rejects_semi_lists_as_lists() {
        for text in ["1,2,3]", "[1,2,3", "[1,2,3]]", "[[1,2,3]"] {
            assert!(
                !is_valid_value(text, ExpectedValueType::List),
                "expected {:?} to be rejected as a List",
                text
            );
        }
    }

    #[test]
    fn rejects_unquoted_strings_null_and_objects_as_lists() {
        assert!(!is_valid_value("schnoz", ExpectedValueType::List));
        assert!(!is_valid_value("null", ExpectedValueType::List));
        assert!(!is_valid_value("{\"seven\":7}", ExpectedValueType::List));
        assert!(!is_valid_value("1,{\"seven\":7},8", ExpectedValueType::List));
    }

    #[test]
    fn accepts_everything_as_text() {
        for text in [
            "Nan", "nan", "NaN", "Infinity", "infinity", "inf", "1 wonky", "2ugly",
            "3.1.3", "75e+", "[1,2,3]", "1,2,3]", "[1,2,3",
        ] {
            assert!(is_valid_value(text, ExpectedValueType::Text));
        }
    }

    #[test]
    fn title_check_rejects_collisions_only() {
        let titles = ["foo", "bar", "baz"];
        assert!(!check_title(&titles, "foo", "bar").is_valid);
        assert!(check_title(&titles, "foo", "fo").is_valid);
        assert!(check_title(&titles, "foo", "foo").is_valid);
    }

    #[test]
    fn editor_state_check_combines_title_and_value() {
        let titles = ["foo", "bar"];
        let state = EditorState {
            title: "bar".to_string(),
            value: "schnoz".to_string(),
            value_type: ExpectedValueType::Number,
            ..EditorState::default()
        };
        let check = check_editor_state(&titles, "foo", &state);
        assert!(!check.is_valid);
        assert_eq!(check.messages.len(), 2);
    }

    #[test]
    fn editor_state_check_skips_value_for_parent_bearing_types() {
        let titles = ["foo"];
        let state = EditorState {
            title: "foo".to_string(),
            node_type: NodeType::Function,
            value: "not a number".to_string(),
            ..EditorState::default()
        };
        assert!(check_editor_state(&titles, "foo", &state).is_valid);
    }

    #[test]
    fn editor_properties_projects_each_variant() {
        let node = Node::Constant {
            value: Value::Number(0.0),
            value_type: ExpectedValueType::Number,
            justification: "why".to_string(),
            coords: [1.0, 2.0],
        };
        let state = editor_properties(&node);
        assert_eq!(state.node_type, NodeType::Constant);
        assert_eq!(state.value, "0");
        assert_eq!(state.justification, "why");

        let node = Node::Distribution {
            distribution: DistributionKind::ContinuousUniform,
            parents: Default::default(),
            justification: String::new(),
            coords: [0.0, 0.0],
        };
        assert_eq!(
            editor_properties(&node).distribution,
            DistributionKind::ContinuousUniform
        );
    }
}
