use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("Cannot convert '{value}' to {target}")]
    Conversion { value: String, target: String },

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    #[error("Function '{function}' error: {message}")]
    Function { function: String, message: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Numeric overflow evaluating {0}")]
    Overflow(String),

    #[error("Unable to resolve reference {0}")]
    UnknownReference(String),
}

impl ExprError {
    pub fn conversion(value: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Conversion {
            value: value.into(),
            target: target.into(),
        }
    }

    pub fn function(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Function {
            function: function.into(),
            message: message.into(),
        }
    }
}
