//! Loads trees from JSON documents.
//!
//! Each node is an object with a `name`, optional scalar `attributes` and
//! optional `children`:
//!
//! ```json
//! {
//!   "name": "catalog",
//!   "children": [
//!     { "name": "item", "attributes": { "id": "a1", "price": 12.5, "stock": true } }
//!   ]
//! }
//! ```

use crate::error::NodepathError;
use nodepath_expr::{Number, NumberKind, Value};
use nodepath_selector::{NodeId, SimpleTree};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonNode {
    name: String,
    #[serde(default)]
    attributes: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    children: Vec<JsonNode>,
}

/// Builds a tree from an already parsed JSON value.
pub fn tree_from_json(value: serde_json::Value) -> Result<SimpleTree, NodepathError> {
    let root: JsonNode = serde_json::from_value(value)?;
    build(root)
}

pub fn tree_from_str(text: &str) -> Result<SimpleTree, NodepathError> {
    let root: JsonNode = serde_json::from_str(text)?;
    build(root)
}

pub fn tree_from_path(path: impl AsRef<Path>) -> Result<SimpleTree, NodepathError> {
    let path = path.as_ref();
    log::debug!("Loading tree from {}", path.display());
    let text = fs::read_to_string(path)?;
    tree_from_str(&text)
}

fn build(root: JsonNode) -> Result<SimpleTree, NodepathError> {
    let mut tree = SimpleTree::new(root.name.as_str());
    let id = tree.root_id();
    fill(&mut tree, id, root)?;
    log::debug!("Loaded tree with {} nodes", tree.len());
    Ok(tree)
}

fn fill(tree: &mut SimpleTree, id: NodeId, node: JsonNode) -> Result<(), NodepathError> {
    for (name, value) in node.attributes {
        let value = attribute_value(&name, value)?;
        tree.set_attribute(id, name, value);
    }
    for child in node.children {
        let child_id = tree.add_child(id, child.name.as_str());
        fill(tree, child_id, child)?;
    }
    Ok(())
}

fn attribute_value(name: &str, value: serde_json::Value) -> Result<Value, NodepathError> {
    match value {
        serde_json::Value::String(s) => Ok(Value::Text(s)),
        serde_json::Value::Bool(b) => Ok(Value::Boolean(b)),
        serde_json::Value::Number(n) => {
            let text = n.to_string();
            let number = match NumberKind::Decimal.parse(&text) {
                Ok(number) => number,
                // Exponent forms and values beyond decimal range.
                Err(_) => Number::Double(n.as_f64().unwrap_or(f64::NAN)),
            };
            Ok(Value::Number(number))
        }
        other => Err(NodepathError::Tree(format!(
            "attribute '{}' must be a string, number or boolean, found {}",
            name, other
        ))),
    }
}
