//! Conversions between value kinds.

use crate::error::ExprError;
use crate::number::{Number, NumberKind};
use crate::value::{Value, ValueKind};

/// Converts `value` to `target`.
///
/// Booleans and numbers always convert. Text converts to a boolean by being
/// non-empty, but must parse completely to become a number.
pub fn convert(value: Value, target: ValueKind, kind: NumberKind) -> Result<Value, ExprError> {
    match (value, target) {
        (value, target) if value.kind() == target => Ok(value),
        (Value::Number(n), ValueKind::Boolean) => Ok(Value::Boolean(!n.is_zero() && !n.is_nan())),
        (Value::Text(s), ValueKind::Boolean) => Ok(Value::Boolean(!s.is_empty())),
        (Value::Boolean(b), ValueKind::Number) => {
            Ok(Value::Number(kind.from_usize(usize::from(b))))
        }
        (Value::Text(s), ValueKind::Number) => kind.parse(&s).map(Value::Number),
        (value, ValueKind::Text) => Ok(Value::Text(value.to_string())),
        // Every same-kind pair was handled by the first arm.
        (value, target) => Err(ExprError::conversion(value.to_string(), target.to_string())),
    }
}

pub fn to_boolean(value: Value, kind: NumberKind) -> Result<bool, ExprError> {
    match convert(value, ValueKind::Boolean, kind)? {
        Value::Boolean(b) => Ok(b),
        other => Err(ExprError::conversion(other.to_string(), "boolean")),
    }
}

pub fn to_number(value: Value, kind: NumberKind) -> Result<Number, ExprError> {
    match convert(value, ValueKind::Number, kind)? {
        Value::Number(n) => Ok(n),
        other => Err(ExprError::conversion(other.to_string(), "number")),
    }
}

pub fn to_text(value: Value) -> String {
    match value {
        Value::Text(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_boolean_is_non_empty() {
        assert_eq!(to_boolean(Value::from("x"), NumberKind::Decimal), Ok(true));
        assert_eq!(to_boolean(Value::empty(), NumberKind::Decimal), Ok(false));
    }

    #[test]
    fn test_number_to_boolean() {
        assert_eq!(to_boolean(Value::from(0), NumberKind::Decimal), Ok(false));
        assert_eq!(to_boolean(Value::from(f64::NAN), NumberKind::Double), Ok(false));
        assert_eq!(to_boolean(Value::from(2.5), NumberKind::Double), Ok(true));
    }

    #[test]
    fn test_text_to_number_is_strict() {
        assert_eq!(
            to_number(Value::from(" 12 "), NumberKind::Decimal),
            Ok(Number::from(12))
        );
        assert!(matches!(
            to_number(Value::from("twelve"), NumberKind::Decimal),
            Err(ExprError::Conversion { .. })
        ));
    }

    #[test]
    fn test_boolean_to_number_and_text() {
        assert_eq!(
            convert(Value::from(true), ValueKind::Number, NumberKind::Double),
            Ok(Value::from(1.0))
        );
        assert_eq!(to_text(Value::from(false)), "false");
        assert_eq!(to_text(Value::from(3)), "3");
    }
}
