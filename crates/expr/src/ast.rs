//! Defines the expression tree produced for selector predicates.

use crate::value::Value;
use itertools::Itertools;
use std::fmt;

/// An expression that can be evaluated against an
/// [`ExpressionContext`](crate::ExpressionContext).
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Value(Value),
    /// Resolved by the context at evaluation time, never at compile time.
    Reference(Reference),
    Call {
        function: String,
        parameters: Vec<Expression>,
    },
    Negate(Box<Expression>),
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn value(value: impl Into<Value>) -> Self {
        Expression::Value(value.into())
    }

    pub fn attribute(name: impl Into<String>) -> Self {
        Expression::Reference(Reference::Attribute(name.into()))
    }

    pub fn position() -> Self {
        Expression::Reference(Reference::Position)
    }

    pub fn call(function: impl Into<String>, parameters: Vec<Expression>) -> Self {
        Expression::Call {
            function: function.into(),
            parameters,
        }
    }

    pub fn negate(expression: Expression) -> Self {
        Expression::Negate(Box::new(expression))
    }

    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Expression::Binary { .. })
    }
}

/// A placeholder resolved against the current node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// `@name`
    Attribute(String),
    /// The reserved `position()` function.
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    // Logical
    Or,
    And,
    // Equality
    Equals,
    NotEquals,
    // Relational
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,
    // Additive
    Add,
    Subtract,
    // Multiplicative
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Or => "or",
            BinaryOperator::And => "and",
            BinaryOperator::Equals => "=",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanEquals => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanEquals => ">=",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "div",
            BinaryOperator::Modulo => "mod",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Attribute(name) => write!(f, "@{}", name),
            Reference::Position => f.write_str("position()"),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Value(Value::Text(s)) => write!(f, "\"{}\"", s),
            Expression::Value(Value::Boolean(b)) => write!(f, "{}()", b),
            Expression::Value(value) => write!(f, "{}", value),
            Expression::Reference(reference) => write!(f, "{}", reference),
            Expression::Call {
                function,
                parameters,
            } => write!(f, "{}({})", function, parameters.iter().join(", ")),
            Expression::Negate(expression) => write!(f, "-{}", Operand(expression)),
            Expression::Binary {
                operator,
                left,
                right,
            } => write!(f, "{} {} {}", Operand(left), operator, Operand(right)),
        }
    }
}

// Nested binary operands are parenthesised so the rendering re-parses to the same tree.
struct Operand<'e>(&'e Expression);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_binary() {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
