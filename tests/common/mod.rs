pub mod fixtures;

use nodepath::{Node, SimpleTree, json};
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Loads a JSON fixture into a tree, panicking on malformed fixtures.
pub fn load(document: Value) -> SimpleTree {
    json::tree_from_json(document).expect("fixture is a valid tree document")
}

/// The value of attribute `name` on each node, rendered as text.
pub fn attribute_of<N: Node>(nodes: &[N], name: &str) -> Vec<String> {
    nodes
        .iter()
        .map(|n| n.attribute(name).map(|v| v.to_string()).unwrap_or_default())
        .collect()
}

pub fn names_of<N: Node>(nodes: &[N]) -> Vec<String> {
    nodes.iter().map(|n| n.name().to_string()).collect()
}
