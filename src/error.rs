use nodepath_expr::ExprError;
use nodepath_selector::SelectorError;
use thiserror::Error;

/// Everything that can go wrong loading a tree and running a selector over it.
#[derive(Error, Debug)]
pub enum NodepathError {
    #[error("Selector failed: {0}")]
    Selector(#[from] SelectorError),

    #[error("Expression failed: {0}")]
    Expression(#[from] ExprError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tree document: {0}")]
    Tree(String),
}
