//! XPath-like node selectors over any tree.
//!
//! Selector text such as `//item[@price > 10]/child::name` is parsed by a
//! grammar-driven parser into a [`SelectorToken`] tree, compiled into an
//! immutable [`Selector`] chain, and evaluated against any type implementing
//! [`Node`].
//!
//! ```ignore
//! use nodepath_selector::{FunctionRegistry, SimpleTree, compile};
//!
//! let tree = SimpleTree::from_outline(r#"root{item(price=12), item(price=4)}"#)?;
//! let functions = FunctionRegistry::default();
//! let selector = compile("item[@price > 10]", &functions)?;
//! let items = selector.select_all(&tree.root(), &functions)?;
//! ```

pub mod axes;
pub mod compiler;
pub mod config;
pub mod context;
mod engine;
pub mod error;
pub mod grammar;
pub mod node;
pub mod parser;
pub mod precedence;
pub mod predicate;
pub mod selector;
pub mod simple;
pub mod token;

pub use compiler::{SelectorCompiler, compile};
pub use config::SelectorConfig;
#[cfg(any(test, feature = "testing"))]
pub use context::FakeNodeSelectorContext;
pub use context::{BasicNodeSelectorContext, NodeExpressionContext, NodeSelectorContext};
pub use error::{GrammarError, SelectorError};
pub use node::Node;
pub use nodepath_expr::{Expression, FunctionRegistry, NumberKind, Value};
pub use parser::{parse_expression, parse_predicate};
pub use selector::{Predicate, Selector, Step};
pub use simple::{NodeId, SimpleNode, SimpleTree};
pub use token::{Axis, SelectorToken, Symbol};
