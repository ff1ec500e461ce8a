//! An in-memory arena tree implementing [`Node`].
//!
//! Trees can be built programmatically or from a compact outline:
//!
//! ```text
//! root{a(id="x", n=1){b, c}, d}
//! ```
//!
//! Each node is a name, optional `(name=value, ...)` attributes and optional
//! `{...}` children. Attribute values are quoted text, decimal numbers or
//! `true`/`false`.

use crate::error::SelectorError;
use crate::node::Node;
use nodepath_expr::{Number, Value};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag_no_case, take_while, take_while1},
    character::complete::{char, digit1, multispace0, satisfy},
    combinator::{map, map_res, opt, recognize, value},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, separated_pair},
};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Identifies a node within its [`SimpleTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    name: String,
    attributes: Vec<(String, Value)>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct SimpleTree {
    nodes: Vec<NodeData>,
}

impl SimpleTree {
    /// Creates a tree holding only a root node.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![NodeData {
                name: root_name.into(),
                attributes: Vec::new(),
                children: Vec::new(),
                parent: None,
            }],
        }
    }

    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a child as the last child of `parent`.
    ///
    /// # Panics
    /// If `parent` does not belong to this tree.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            parent: Some(parent),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Sets an attribute, replacing an existing value of the same name.
    ///
    /// # Panics
    /// If `node` does not belong to this tree.
    pub fn set_attribute(&mut self, node: NodeId, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        let attributes = &mut self.nodes[node.0].attributes;
        match attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => attributes.push((name, value)),
        }
    }

    pub fn root(&self) -> SimpleNode<'_> {
        SimpleNode {
            id: self.root_id(),
            tree: self,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<SimpleNode<'_>> {
        (id.0 < self.nodes.len()).then_some(SimpleNode { id, tree: self })
    }

    /// The first node named `name`, in document order.
    pub fn find(&self, name: &str) -> Option<SimpleNode<'_>> {
        // Ids are assigned depth first only for outline trees, so walk the tree.
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            if node.data().name == name {
                return Some(node);
            }
            stack.extend(node.data().children.iter().rev().map(|&id| SimpleNode { id, tree: self }));
        }
        None
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Builds a tree from its outline notation.
    pub fn from_outline(text: &str) -> Result<Self, SelectorError> {
        let parsed = delimited(multispace0, outline_node, multispace0).parse(text);
        match parsed {
            Ok(("", root)) => {
                let mut tree = SimpleTree::new(root.name);
                let id = tree.root_id();
                for (name, value) in root.attributes {
                    tree.set_attribute(id, name, value);
                }
                for child in root.children {
                    tree.insert(id, child);
                }
                Ok(tree)
            }
            Ok((rest, _)) => Err(SelectorError::parse(
                text,
                text.len() - rest.len(),
                "Unexpected input in tree outline",
            )),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(SelectorError::parse(
                text,
                text.len() - e.input.len(),
                "Invalid tree outline",
            )),
            Err(nom::Err::Incomplete(_)) => Err(SelectorError::parse(
                text,
                text.len(),
                "Incomplete tree outline",
            )),
        }
    }

    fn insert(&mut self, parent: NodeId, outline: OutlineNode) {
        let id = self.add_child(parent, outline.name);
        for (name, value) in outline.attributes {
            self.set_attribute(id, name, value);
        }
        for child in outline.children {
            self.insert(id, child);
        }
    }
}

/// A handle to one node of a [`SimpleTree`].
#[derive(Clone, Copy)]
pub struct SimpleNode<'t> {
    id: NodeId,
    tree: &'t SimpleTree,
}

impl<'t> SimpleNode<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id.0]
    }

    fn handle(&self, id: NodeId) -> SimpleNode<'t> {
        SimpleNode {
            id,
            tree: self.tree,
        }
    }
}

impl PartialEq for SimpleNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl fmt::Debug for SimpleNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.data().name, self.id.0)
    }
}

impl<'t> Node for SimpleNode<'t> {
    type Name = String;

    fn name(&self) -> String {
        self.data().name.clone()
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + '_> {
        Box::new(self.data().children.iter().map(|&id| self.handle(id)))
    }

    fn parent(&self) -> Option<Self> {
        self.data().parent.map(|id| self.handle(id))
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = (&str, Value)> + '_> {
        Box::new(
            self.data()
                .attributes
                .iter()
                .map(|(name, value)| (name.as_str(), value.clone())),
        )
    }
}

// --- Outline Parser ---

struct OutlineNode {
    name: String,
    attributes: Vec<(String, Value)>,
    children: Vec<OutlineNode>,
}

fn ws<'a, F, O>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

fn outline_name(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            satisfy(|c| c.is_alphabetic() || c == '_'),
            take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '-' || c == '.'),
        )),
        str::to_string,
    )
    .parse(input)
}

fn outline_value(input: &str) -> IResult<&str, Value> {
    alt((
        map(
            alt((
                delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
                delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            )),
            Value::from,
        ),
        map_res(
            recognize((
                opt(char('-')),
                digit1,
                opt(pair(char('.'), take_while1(|c: char| c.is_ascii_digit()))),
            )),
            |text: &str| Decimal::from_str(text).map(|d| Value::Number(Number::Decimal(d))),
        ),
        value(Value::Boolean(true), tag_no_case("true")),
        value(Value::Boolean(false), tag_no_case("false")),
    ))
    .parse(input)
}

fn outline_attribute(input: &str) -> IResult<&str, (String, Value)> {
    separated_pair(ws(outline_name), char('='), ws(outline_value)).parse(input)
}

fn outline_node(input: &str) -> IResult<&str, OutlineNode> {
    map(
        (
            outline_name,
            opt(preceded(
                multispace0,
                delimited(char('('), separated_list0(char(','), outline_attribute), char(')')),
            )),
            opt(preceded(
                multispace0,
                delimited(
                    char('{'),
                    separated_list0(char(','), ws(outline_node)),
                    preceded(multispace0, char('}')),
                ),
            )),
        ),
        |(name, attributes, children)| OutlineNode {
            name,
            attributes: attributes.unwrap_or_default(),
            children: children.unwrap_or_default(),
        },
    )
    .parse(input)
}
