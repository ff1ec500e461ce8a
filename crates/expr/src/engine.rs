//! The tree-walking evaluator for [`Expression`]s.
use crate::ast::{BinaryOperator, Expression};
use crate::context::ExpressionContext;
use crate::convert::{to_boolean, to_number};
use crate::error::ExprError;
use crate::operators::evaluate_binary;
use crate::value::Value;

/// Evaluates an expression against the given context.
pub fn evaluate(expr: &Expression, ctx: &dyn ExpressionContext) -> Result<Value, ExprError> {
    match expr {
        Expression::Value(value) => Ok(match value {
            Value::Number(n) => Value::Number(ctx.number_kind().convert(*n)),
            other => other.clone(),
        }),
        Expression::Reference(reference) => ctx.reference(reference),
        Expression::Call {
            function,
            parameters,
        } => {
            let func = ctx
                .function(function)
                .ok_or_else(|| ExprError::UnknownFunction(function.clone()))?;
            let args = parameters
                .iter()
                .map(|p| evaluate(p, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            func(ctx, args)
        }
        Expression::Negate(inner) => {
            let value = evaluate(inner, ctx)?;
            Ok(Value::Number(to_number(value, ctx.number_kind())?.negate()))
        }
        Expression::Binary {
            operator,
            left,
            right,
        } => {
            let kind = ctx.number_kind();
            match operator {
                BinaryOperator::Or => {
                    if to_boolean(evaluate(left, ctx)?, kind)? {
                        return Ok(Value::Boolean(true));
                    }
                    Ok(Value::Boolean(to_boolean(evaluate(right, ctx)?, kind)?))
                }
                BinaryOperator::And => {
                    if !to_boolean(evaluate(left, ctx)?, kind)? {
                        return Ok(Value::Boolean(false));
                    }
                    Ok(Value::Boolean(to_boolean(evaluate(right, ctx)?, kind)?))
                }
                op => {
                    let left = evaluate(left, ctx)?;
                    let right = evaluate(right, ctx)?;
                    log::trace!("Evaluating {} {} {}", left, op, right);
                    evaluate_binary(*op, left, right, kind)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Reference;
    use crate::functions::{ExpressionFunction, FunctionRegistry};
    use crate::number::{Number, NumberKind};
    use std::collections::HashMap;

    struct TestContext {
        attributes: HashMap<String, Value>,
        position: usize,
        functions: FunctionRegistry,
        number_kind: NumberKind,
    }

    impl TestContext {
        fn new() -> Self {
            Self {
                attributes: HashMap::new(),
                position: 1,
                functions: FunctionRegistry::default(),
                number_kind: NumberKind::Decimal,
            }
        }

        fn with_attribute(mut self, name: &str, value: impl Into<Value>) -> Self {
            self.attributes.insert(name.to_string(), value.into());
            self
        }
    }

    impl ExpressionContext for TestContext {
        fn reference(&self, reference: &Reference) -> Result<Value, ExprError> {
            match reference {
                Reference::Attribute(name) => {
                    Ok(self.attributes.get(name).cloned().unwrap_or_else(Value::empty))
                }
                Reference::Position => Ok(Value::Number(self.number_kind.from_usize(self.position))),
            }
        }

        fn function(&self, name: &str) -> Option<ExpressionFunction> {
            self.functions.get(name)
        }

        fn number_kind(&self) -> NumberKind {
            self.number_kind
        }
    }

    fn failing(_ctx: &dyn ExpressionContext, _args: Vec<Value>) -> Result<Value, ExprError> {
        Err(ExprError::function("boom", "should not be called"))
    }

    #[test]
    fn test_arithmetic_with_attributes() {
        let ctx = TestContext::new().with_attribute("price", 6);
        let expr = Expression::binary(
            BinaryOperator::GreaterThan,
            Expression::binary(
                BinaryOperator::Multiply,
                Expression::attribute("price"),
                Expression::value(2),
            ),
            Expression::value(10),
        );
        assert_eq!(evaluate(&expr, &ctx), Ok(Value::from(true)));
    }

    #[test]
    fn test_missing_attribute_is_empty_text() {
        let ctx = TestContext::new();
        let expr = Expression::binary(
            BinaryOperator::Equals,
            Expression::attribute("nope"),
            Expression::value(""),
        );
        assert_eq!(evaluate(&expr, &ctx), Ok(Value::from(true)));
    }

    #[test]
    fn test_short_circuit_skips_right_operand() {
        let mut ctx = TestContext::new();
        ctx.functions.register("boom", failing);
        let and = Expression::binary(
            BinaryOperator::And,
            Expression::value(false),
            Expression::call("boom", vec![]),
        );
        assert_eq!(evaluate(&and, &ctx), Ok(Value::from(false)));
        let or = Expression::binary(
            BinaryOperator::Or,
            Expression::value(1),
            Expression::call("boom", vec![]),
        );
        assert_eq!(evaluate(&or, &ctx), Ok(Value::from(true)));
    }

    #[test]
    fn test_unknown_function() {
        let ctx = TestContext::new();
        let expr = Expression::call("nope", vec![]);
        assert_eq!(
            evaluate(&expr, &ctx),
            Err(ExprError::UnknownFunction("nope".to_string()))
        );
    }

    #[test]
    fn test_negate_and_double_kind() {
        let mut ctx = TestContext::new();
        ctx.number_kind = NumberKind::Double;
        ctx.position = 3;
        let expr = Expression::negate(Expression::position());
        let value = evaluate(&expr, &ctx).unwrap();
        assert_eq!(value, Value::Number(Number::Double(-3.0)));
        let literal = evaluate(&Expression::value(2), &ctx).unwrap();
        assert_eq!(literal.as_number().map(|n| n.kind()), Some(NumberKind::Double));
    }

    #[test]
    fn test_division_by_zero_propagates() {
        let ctx = TestContext::new();
        let expr = Expression::binary(
            BinaryOperator::Divide,
            Expression::value(1),
            Expression::value(0),
        );
        assert_eq!(evaluate(&expr, &ctx), Err(ExprError::DivisionByZero));
    }
}
