use crate::ast::BinaryOperator;
use crate::convert::{to_boolean, to_number};
use crate::error::ExprError;
use crate::number::NumberKind;
use crate::value::Value;
use std::cmp::Ordering;

/// Applies a binary operator to two already evaluated operands.
///
/// `and`/`or` are accepted here too, but the engine short-circuits them before
/// the right operand is evaluated.
pub fn evaluate_binary(
    op: BinaryOperator,
    left: Value,
    right: Value,
    kind: NumberKind,
) -> Result<Value, ExprError> {
    match op {
        BinaryOperator::Or => Ok(Value::Boolean(
            to_boolean(left, kind)? || to_boolean(right, kind)?,
        )),
        BinaryOperator::And => Ok(Value::Boolean(
            to_boolean(left, kind)? && to_boolean(right, kind)?,
        )),
        BinaryOperator::Equals => Ok(Value::Boolean(values_equal(left, right, kind)?)),
        BinaryOperator::NotEquals => Ok(Value::Boolean(!values_equal(left, right, kind)?)),
        BinaryOperator::LessThan => evaluate_relational(left, right, kind, |ord| ord == Ordering::Less),
        BinaryOperator::LessThanEquals => {
            evaluate_relational(left, right, kind, |ord| ord != Ordering::Greater)
        }
        BinaryOperator::GreaterThan => {
            evaluate_relational(left, right, kind, |ord| ord == Ordering::Greater)
        }
        BinaryOperator::GreaterThanEquals => {
            evaluate_relational(left, right, kind, |ord| ord != Ordering::Less)
        }
        BinaryOperator::Add => Ok(Value::Number(to_number(left, kind)?.add(to_number(right, kind)?)?)),
        BinaryOperator::Subtract => Ok(Value::Number(
            to_number(left, kind)?.subtract(to_number(right, kind)?)?,
        )),
        BinaryOperator::Multiply => Ok(Value::Number(
            to_number(left, kind)?.multiply(to_number(right, kind)?)?,
        )),
        BinaryOperator::Divide => Ok(Value::Number(
            to_number(left, kind)?.divide(to_number(right, kind)?)?,
        )),
        BinaryOperator::Modulo => Ok(Value::Number(
            to_number(left, kind)?.modulo(to_number(right, kind)?)?,
        )),
    }
}

fn values_equal(left: Value, right: Value, kind: NumberKind) -> Result<bool, ExprError> {
    match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => Ok(a == b),
        (Value::Boolean(a), other) | (other, Value::Boolean(a)) => Ok(a == to_boolean(other, kind)?),
        (Value::Number(a), Value::Number(b)) => Ok(a == b),
        (Value::Number(n), Value::Text(s)) | (Value::Text(s), Value::Number(n)) => {
            // Text that is not numeric can still equal the number's text form.
            match kind.parse(&s) {
                Ok(parsed) => Ok(parsed == n),
                Err(_) => Ok(s == n.to_string()),
            }
        }
        (Value::Text(a), Value::Text(b)) => Ok(a == b),
    }
}

fn evaluate_relational<F>(
    left: Value,
    right: Value,
    kind: NumberKind,
    predicate: F,
) -> Result<Value, ExprError>
where
    F: Fn(Ordering) -> bool,
{
    let ordering = match (left, right) {
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(&b)),
        (a, b) => to_number(a, kind)?.partial_cmp(&to_number(b, kind)?),
    };
    // NaN compares false against everything.
    Ok(Value::Boolean(ordering.is_some_and(predicate)))
}
