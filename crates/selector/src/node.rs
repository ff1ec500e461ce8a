//! Defines the core abstraction for a navigable, read-only tree.
use nodepath_expr::Value;
use std::fmt;

/// The contract selectors are evaluated against.
///
/// Selectors are written exclusively against this trait, so any tree (an XML
/// document, a JSON view, an in-memory arena) can be queried once it exposes
/// names, children, a parent link and attributes. Handles are expected to be
/// cheap to clone; equality must identify the same node, not equal content.
pub trait Node: Clone + PartialEq + fmt::Debug {
    /// The host's name type. Name tests compare with `==`, so case sensitivity
    /// is whatever this type's equality says.
    type Name: Clone + PartialEq + fmt::Debug + fmt::Display;

    fn name(&self) -> Self::Name;

    /// The direct children, in document order.
    fn children(&self) -> Box<dyn Iterator<Item = Self> + '_>;

    /// The parent node, or `None` for the root.
    fn parent(&self) -> Option<Self>;

    /// The attributes as name/value pairs.
    fn attributes(&self) -> Box<dyn Iterator<Item = (&str, Value)> + '_>;

    /// The root of the tree containing this node.
    fn root(&self) -> Self {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Looks up a single attribute by a linear scan.
    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes()
            .find(|(attribute, _)| *attribute == name)
            .map(|(_, value)| value)
    }
}
