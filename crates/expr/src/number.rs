//! Numbers in two representations, selected by a [`NumberKind`] policy.

use crate::error::ExprError;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The numeric representation used when numbers enter an expression: parsed
/// literals, numeric attributes and positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NumberKind {
    /// Fixed-precision decimal arithmetic. (Default)
    #[default]
    Decimal,
    /// IEEE 754 double precision.
    Double,
}

impl NumberKind {
    /// Converts a parsed decimal into this kind.
    pub fn from_decimal(self, value: Decimal) -> Number {
        match self {
            NumberKind::Decimal => Number::Decimal(value),
            NumberKind::Double => Number::Double(value.to_f64().unwrap_or(f64::NAN)),
        }
    }

    /// Converts a 1-based position or any other count into this kind.
    pub fn from_usize(self, value: usize) -> Number {
        match self {
            NumberKind::Decimal => Number::Decimal(Decimal::from(value as u64)),
            NumberKind::Double => Number::Double(value as f64),
        }
    }

    /// Re-expresses an existing number in this kind.
    pub fn convert(self, number: Number) -> Number {
        match (self, number) {
            (NumberKind::Decimal, Number::Double(n)) => match Decimal::from_f64(n) {
                Some(d) => Number::Decimal(d),
                // NaN and infinities have no decimal form.
                None => Number::Double(n),
            },
            (NumberKind::Double, Number::Decimal(d)) => Number::Double(d.to_f64().unwrap_or(f64::NAN)),
            (_, number) => number,
        }
    }

    /// Parses text such as `"12.5"` into this kind.
    pub fn parse(self, text: &str) -> Result<Number, ExprError> {
        let trimmed = text.trim();
        match self {
            NumberKind::Decimal => Decimal::from_str(trimmed)
                .map(Number::Decimal)
                .map_err(|_| ExprError::conversion(text, "number")),
            NumberKind::Double => trimmed
                .parse::<f64>()
                .map(Number::Double)
                .map_err(|_| ExprError::conversion(text, "number")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Number {
    Decimal(Decimal),
    Double(f64),
}

impl Number {
    pub fn kind(&self) -> NumberKind {
        match self {
            Number::Decimal(_) => NumberKind::Decimal,
            Number::Double(_) => NumberKind::Double,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
            Number::Double(n) => *n,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Decimal(d) => d.is_zero(),
            Number::Double(n) => *n == 0.0,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Number::Double(n) if n.is_nan())
    }

    /// True when this number equals the given 1-based position.
    pub fn is_position(&self, position: usize) -> bool {
        match self {
            Number::Decimal(d) => *d == Decimal::from(position as u64),
            Number::Double(n) => *n == position as f64,
        }
    }

    pub fn add(self, other: Number) -> Result<Number, ExprError> {
        self.combine(other, "+", Decimal::checked_add, |a, b| a + b)
    }

    pub fn subtract(self, other: Number) -> Result<Number, ExprError> {
        self.combine(other, "-", Decimal::checked_sub, |a, b| a - b)
    }

    pub fn multiply(self, other: Number) -> Result<Number, ExprError> {
        self.combine(other, "*", Decimal::checked_mul, |a, b| a * b)
    }

    pub fn divide(self, other: Number) -> Result<Number, ExprError> {
        if other.is_zero() {
            return Err(ExprError::DivisionByZero);
        }
        self.combine(other, "div", Decimal::checked_div, |a, b| a / b)
    }

    pub fn modulo(self, other: Number) -> Result<Number, ExprError> {
        if other.is_zero() {
            return Err(ExprError::DivisionByZero);
        }
        self.combine(other, "mod", Decimal::checked_rem, |a, b| a % b)
    }

    pub fn negate(self) -> Number {
        match self {
            Number::Decimal(d) => Number::Decimal(-d),
            Number::Double(n) => Number::Double(-n),
        }
    }

    pub fn floor(self) -> Number {
        match self {
            Number::Decimal(d) => Number::Decimal(d.floor()),
            Number::Double(n) => Number::Double(n.floor()),
        }
    }

    pub fn ceiling(self) -> Number {
        match self {
            Number::Decimal(d) => Number::Decimal(d.ceil()),
            Number::Double(n) => Number::Double(n.ceil()),
        }
    }

    /// Rounds half towards positive infinity.
    pub fn round(self) -> Result<Number, ExprError> {
        match self {
            Number::Decimal(d) if d.fract().is_zero() => Ok(Number::Decimal(d)),
            Number::Decimal(d) => d
                .checked_add(Decimal::new(5, 1))
                .map(|r| Number::Decimal(r.floor()))
                .ok_or_else(|| ExprError::Overflow(format!("round({})", d))),
            Number::Double(n) => Ok(Number::Double((n + 0.5).floor())),
        }
    }

    // Decimal pairs stay decimal; anything involving a double widens to double.
    fn combine(
        self,
        other: Number,
        operator: &str,
        decimal: fn(Decimal, Decimal) -> Option<Decimal>,
        double: fn(f64, f64) -> f64,
    ) -> Result<Number, ExprError> {
        match (self, other) {
            (Number::Decimal(a), Number::Decimal(b)) => decimal(a, b)
                .map(Number::Decimal)
                .ok_or_else(|| ExprError::Overflow(format!("{} {} {}", a, operator, b))),
            (a, b) => Ok(Number::Double(double(a.to_f64(), b.to_f64()))),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Decimal(a), Number::Decimal(b)) => a == b,
            (a, b) => a.to_f64() == b.to_f64(),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Number::Decimal(a), Number::Decimal(b)) => a.partial_cmp(b),
            (a, b) => a.to_f64().partial_cmp(&b.to_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Decimal(d) => write!(f, "{}", d.normalize()),
            Number::Double(n) => write!(f, "{}", n),
        }
    }
}

impl From<Decimal> for Number {
    fn from(value: Decimal) -> Self {
        Number::Decimal(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Double(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Decimal(Decimal::from(value))
    }
}
