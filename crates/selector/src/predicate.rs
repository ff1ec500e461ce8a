//! Compiles predicate parse trees into [`Expression`] trees.
//!
//! Attribute names and `position()` become references, resolved against the
//! live node at evaluation time, so one compiled predicate serves every node a
//! selector visits.

use crate::error::SelectorError;
use crate::token::SelectorToken;
use nodepath_expr::{Expression, NumberKind, Value};

/// The function name bound to the candidate's position rather than the registry.
pub const POSITION_FUNCTION: &str = "position";

pub struct PredicateCompiler<'a> {
    is_function: &'a dyn Fn(&str) -> bool,
    number_kind: NumberKind,
    /// Source of the predicate being compiled, for error messages.
    predicate: &'a str,
}

impl<'a> PredicateCompiler<'a> {
    pub fn new(is_function: &'a dyn Fn(&str) -> bool, number_kind: NumberKind, predicate: &'a str) -> Self {
        Self {
            is_function,
            number_kind,
            predicate,
        }
    }

    pub fn compile(&self, token: &SelectorToken) -> Result<Expression, SelectorError> {
        match token {
            SelectorToken::Predicate { expression, .. } | SelectorToken::Group { expression, .. } => {
                self.compile(expression)
            }
            SelectorToken::Expression { .. } => match token.without_noise().as_slice() {
                [single] => self.compile(single),
                [] => Err(SelectorError::invalid_token(format!(
                    "Empty expression in predicate '{}'",
                    self.predicate
                ))),
                [_, extra, ..] => Err(SelectorError::invalid_token(format!(
                    "Expected a single expression in predicate '{}', found '{}'",
                    self.predicate, extra
                ))),
            },
            SelectorToken::Binary {
                operator,
                left,
                right,
                ..
            } => Ok(Expression::binary(
                *operator,
                self.compile(left)?,
                self.compile(right)?,
            )),
            SelectorToken::Negative { value, .. } => Ok(Expression::negate(self.compile(value)?)),
            SelectorToken::Attribute { name, .. } => Ok(Expression::attribute(name.as_str())),
            SelectorToken::Function {
                name, parameters, ..
            } => self.compile_function(name, parameters),
            SelectorToken::Number { value, .. } => {
                Ok(Expression::value(Value::Number(self.number_kind.from_decimal(*value))))
            }
            SelectorToken::QuotedText { value, .. } => Ok(Expression::value(value.as_str())),
            other => Err(SelectorError::invalid_token(format!(
                "Unexpected '{}' in predicate '{}'",
                other, self.predicate
            ))),
        }
    }

    fn compile_function(
        &self,
        name: &str,
        parameters: &[SelectorToken],
    ) -> Result<Expression, SelectorError> {
        if name.eq_ignore_ascii_case(POSITION_FUNCTION) && parameters.is_empty() {
            return Ok(Expression::position());
        }
        if !(self.is_function)(name) {
            return Err(SelectorError::UnknownFunction {
                function: name.to_string(),
                predicate: self.predicate.to_string(),
            });
        }
        let parameters = parameters
            .iter()
            .map(|p| self.compile(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Expression::call(name, parameters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_predicate;
    use nodepath_expr::{BinaryOperator, FunctionRegistry, Number};
    use rust_decimal::Decimal;

    fn compile_with(text: &str, is_function: &dyn Fn(&str) -> bool) -> Result<Expression, SelectorError> {
        let token = parse_predicate(text)?;
        PredicateCompiler::new(is_function, NumberKind::Decimal, text).compile(&token)
    }

    fn compile(text: &str) -> Result<Expression, SelectorError> {
        let functions = FunctionRegistry::default();
        compile_with(text, &|name| functions.contains_function(name))
    }

    #[test]
    fn test_compile_comparison() {
        assert_eq!(
            compile("@price >= 10").unwrap(),
            Expression::binary(
                BinaryOperator::GreaterThanEquals,
                Expression::attribute("price"),
                Expression::value(Value::Number(Number::Decimal(Decimal::from(10)))),
            )
        );
    }

    #[test]
    fn test_compile_precedence_and_groups() {
        let expected = Expression::binary(
            BinaryOperator::Multiply,
            Expression::binary(
                BinaryOperator::Add,
                Expression::value(Decimal::from(1)),
                Expression::value(Decimal::from(2)),
            ),
            Expression::value(Decimal::from(3)),
        );
        assert_eq!(compile("(1 + 2) * 3").unwrap(), expected);
    }

    #[test]
    fn test_position_is_a_reference() {
        assert_eq!(
            compile("position() = 2").unwrap(),
            Expression::binary(
                BinaryOperator::Equals,
                Expression::position(),
                Expression::value(Decimal::from(2)),
            )
        );
        // position() is reserved even when the host does not list it.
        assert_eq!(compile_with("POSITION()", &|_| false).unwrap(), Expression::position());
    }

    #[test]
    fn test_function_call_and_negation() {
        assert_eq!(
            compile("contains(@id, 'x') and -@n < 0").unwrap(),
            Expression::binary(
                BinaryOperator::And,
                Expression::call(
                    "contains",
                    vec![Expression::attribute("id"), Expression::value("x")]
                ),
                Expression::binary(
                    BinaryOperator::LessThan,
                    Expression::negate(Expression::attribute("n")),
                    Expression::value(Decimal::from(0)),
                ),
            )
        );
    }

    #[test]
    fn test_unknown_function_is_rejected() {
        let err = compile("foo() = 1").unwrap_err();
        assert_eq!(
            err,
            SelectorError::UnknownFunction {
                function: "foo".to_string(),
                predicate: "foo() = 1".to_string(),
            }
        );
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn test_double_number_kind() {
        let token = parse_predicate("1.5").unwrap();
        let expr = PredicateCompiler::new(&|_| true, NumberKind::Double, "1.5")
            .compile(&token)
            .unwrap();
        assert_eq!(expr, Expression::value(Value::Number(Number::Double(1.5))));
    }

    #[test]
    fn test_path_tokens_are_invalid() {
        let token = SelectorToken::Wildcard {
            text: "*".to_string(),
        };
        let err = PredicateCompiler::new(&|_| true, NumberKind::Decimal, "*")
            .compile(&token)
            .unwrap_err();
        assert!(matches!(err, SelectorError::InvalidToken(_)));
    }
}
