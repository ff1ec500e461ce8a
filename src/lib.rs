//! XPath-like node selection over generic trees.
//!
//! This crate ties the workspace together: it re-exports the selector engine
//! from `nodepath-selector` and the expression evaluator from `nodepath-expr`,
//! and adds loading trees from JSON documents.
//!
//! ```ignore
//! let tree = nodepath::json::tree_from_path("catalog.json")?;
//! for item in nodepath::select("//item[@price > 10]", &tree)? {
//!     println!("{}", nodepath::describe(&item));
//! }
//! ```

pub mod error;
pub mod json;

pub use error::NodepathError;
pub use nodepath_expr as expr;
pub use nodepath_selector::{
    Axis, BasicNodeSelectorContext, Expression, FunctionRegistry, Node, NodeSelectorContext,
    NumberKind, Selector, SelectorCompiler, SelectorConfig, SelectorError, SimpleNode, SimpleTree,
    Value, compile, parse_expression, parse_predicate,
};

/// Compiles `selector` with the default functions and selects from the root of `tree`.
pub fn select<'t>(selector: &str, tree: &'t SimpleTree) -> Result<Vec<SimpleNode<'t>>, NodepathError> {
    let functions = FunctionRegistry::default();
    let selector: Selector<SimpleNode<'t>> = compile(selector, &functions)?;
    Ok(selector.select_all(&tree.root(), &functions)?)
}

/// Renders a node as its name followed by its attributes, e.g. `item id="a" price=12`.
pub fn describe<N: Node>(node: &N) -> String {
    let mut line = node.name().to_string();
    for (name, value) in node.attributes() {
        match value {
            Value::Text(text) => line.push_str(&format!(" {}={:?}", name, text)),
            other => line.push_str(&format!(" {}={}", name, other)),
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_and_describe() {
        let tree = SimpleTree::from_outline(r#"list{item(id="a", price=12), item(id="b", price=4)}"#).unwrap();
        let selected = select("item[@price > 10]", &tree).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(describe(&selected[0]), r#"item id="a" price=12"#);
    }

    #[test]
    fn test_select_reports_compile_errors() {
        let tree = SimpleTree::new("root");
        assert!(matches!(
            select("item[", &tree),
            Err(NodepathError::Selector(SelectorError::Parse { .. }))
        ));
    }
}
