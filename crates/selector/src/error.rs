use nodepath_expr::ExprError;
use thiserror::Error;

/// Failures loading the embedded selector grammar. These indicate a packaging
/// defect rather than bad user input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrammarError {
    #[error("Grammar syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Grammar rule '{0}' is defined more than once")]
    DuplicateRule(String),

    #[error("Grammar rule '{rule}' references unknown identifier '{identifier}'")]
    UnknownIdentifier { rule: String, identifier: String },

    #[error("Terminal \"{terminal}\" in rule '{rule}' is not bound to a symbol rule")]
    UnboundTerminal { rule: String, terminal: String },

    #[error("Symbol rule '{0}' must consist of exactly one terminal")]
    InvalidLeafRule(String),

    #[error("Grammar is missing the entry rule '{0}'")]
    MissingEntry(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    #[error("Selector grammar failed to load: {0}")]
    Grammar(#[from] GrammarError),

    #[error("Parse error in '{input}' at column {column}: {message}")]
    Parse {
        input: String,
        column: usize,
        message: String,
    },

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Unknown function '{function}' in predicate '{predicate}'")]
    UnknownFunction { function: String, predicate: String },

    #[error("Invalid node name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Failed to evaluate {selector}: {source}")]
    Evaluation { selector: String, source: ExprError },
}

impl SelectorError {
    /// Builds a parse error, converting a byte offset into a 1-based character column.
    pub fn parse(input: &str, offset: usize, message: impl Into<String>) -> Self {
        let column = input
            .get(..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset)
            + 1;
        Self::Parse {
            input: input.to_string(),
            column,
            message: message.into(),
        }
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken(message.into())
    }
}
