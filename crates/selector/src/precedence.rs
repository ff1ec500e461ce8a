//! Operator-precedence folding for flat predicate token runs.
//!
//! The grammar matches `1 + 2 * 3` as a flat run of terms and operator
//! symbols. Folding repeatedly takes the leftmost operator of the highest
//! priority and merges it with its nearest significant neighbours into a
//! [`SelectorToken::Binary`], until a single token remains.

use crate::error::SelectorError;
use crate::token::SelectorToken;
use nodepath_expr::BinaryOperator;

/// Zero is reserved for tokens the fold leaves untouched.
pub const IGNORED: u8 = 0;

/// The binding strength of an operator, lowest first.
pub fn priority(op: BinaryOperator) -> u8 {
    match op {
        BinaryOperator::Or => 1,
        BinaryOperator::And => 2,
        BinaryOperator::Equals | BinaryOperator::NotEquals => 3,
        BinaryOperator::LessThan
        | BinaryOperator::LessThanEquals
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterThanEquals => 4,
        BinaryOperator::Add | BinaryOperator::Subtract => 5,
        BinaryOperator::Multiply | BinaryOperator::Divide => 6,
        BinaryOperator::Modulo => 7,
    }
}

fn token_priority(token: &SelectorToken) -> u8 {
    token.operator().map(priority).unwrap_or(IGNORED)
}

/// Folds a run of terms and operators into one binary tree token.
///
/// Whitespace between operands is kept inside the binary token's text so the
/// result still reproduces its source.
pub fn fold(mut tokens: Vec<SelectorToken>) -> Result<SelectorToken, SelectorError> {
    while let Some(index) = strongest_operator(&tokens) {
        let left = nearest_operand(&tokens, index, Direction::Left)?;
        let right = nearest_operand(&tokens, index, Direction::Right)?;
        let folded: Vec<SelectorToken> = tokens.drain(left..=right).collect();
        let text = crate::token::joined_text(&folded);
        let operator = folded[index - left]
            .operator()
            .ok_or_else(|| SelectorError::invalid_token(format!("Expected an operator in '{}'", text)))?;
        let mut operands = folded.into_iter();
        let (Some(left_operand), Some(right_operand)) = (operands.next(), operands.last()) else {
            return Err(SelectorError::invalid_token(format!("Missing operand in '{}'", text)));
        };
        tokens.insert(
            left,
            SelectorToken::Binary {
                operator,
                left: Box::new(left_operand),
                right: Box::new(right_operand),
                text,
            },
        );
    }

    let mut significant = tokens.into_iter().filter(|t| !t.is_whitespace());
    match (significant.next(), significant.next()) {
        (Some(token), None) => Ok(token),
        (None, _) => Err(SelectorError::invalid_token("Empty predicate expression")),
        (Some(first), Some(second)) => Err(SelectorError::invalid_token(format!(
            "Expected an operator between '{}' and '{}'",
            first, second
        ))),
    }
}

/// The leftmost operator with the highest priority.
fn strongest_operator(tokens: &[SelectorToken]) -> Option<usize> {
    let mut best: Option<(usize, u8)> = None;
    for (index, token) in tokens.iter().enumerate() {
        let p = token_priority(token);
        if p == IGNORED {
            continue;
        }
        if best.is_none_or(|(_, best_priority)| p > best_priority) {
            best = Some((index, p));
        }
    }
    best.map(|(index, _)| index)
}

#[derive(Clone, Copy)]
enum Direction {
    Left,
    Right,
}

fn nearest_operand(
    tokens: &[SelectorToken],
    operator: usize,
    direction: Direction,
) -> Result<usize, SelectorError> {
    let found = match direction {
        Direction::Left => (0..operator).rev().find(|&i| !tokens[i].is_whitespace()),
        Direction::Right => (operator + 1..tokens.len()).find(|&i| !tokens[i].is_whitespace()),
    };
    match found {
        Some(i) if token_priority(&tokens[i]) == IGNORED => Ok(i),
        _ => Err(SelectorError::invalid_token(format!(
            "Operator '{}' is missing an operand",
            tokens[operator]
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Symbol;
    use rust_decimal::Decimal;

    fn num(n: i64) -> SelectorToken {
        SelectorToken::Number {
            value: Decimal::from(n),
            text: n.to_string(),
        }
    }

    fn op(op: BinaryOperator) -> SelectorToken {
        SelectorToken::Symbol {
            symbol: Symbol::Operator(op),
            text: op.symbol().to_string(),
        }
    }

    fn ws() -> SelectorToken {
        SelectorToken::Whitespace {
            text: " ".to_string(),
        }
    }

    fn shape(token: &SelectorToken) -> String {
        match token {
            SelectorToken::Binary {
                operator,
                left,
                right,
                ..
            } => format!("{}({}, {})", operator, shape(left), shape(right)),
            other => other.text().to_string(),
        }
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let token = fold(vec![
            num(1),
            op(BinaryOperator::Add),
            num(2),
            op(BinaryOperator::Multiply),
            num(3),
        ])
        .unwrap();
        assert_eq!(shape(&token), "+(1, *(2, 3))");
        assert_eq!(token.text(), "1+2*3");
    }

    #[test]
    fn test_same_priority_is_left_associative() {
        let token = fold(vec![
            num(8),
            ws(),
            op(BinaryOperator::Subtract),
            ws(),
            num(4),
            ws(),
            op(BinaryOperator::Subtract),
            ws(),
            num(2),
        ])
        .unwrap();
        assert_eq!(shape(&token), "-(-(8, 4), 2)");
        assert_eq!(token.text(), "8 - 4 - 2");
    }

    #[test]
    fn test_and_groups_before_or() {
        let token = fold(vec![
            num(1),
            op(BinaryOperator::And),
            num(2),
            op(BinaryOperator::Or),
            num(3),
            op(BinaryOperator::And),
            num(4),
        ])
        .unwrap();
        assert_eq!(shape(&token), "or(and(1, 2), and(3, 4))");
    }

    #[test]
    fn test_dangling_operator_is_invalid() {
        assert!(matches!(
            fold(vec![num(1), op(BinaryOperator::Add)]),
            Err(SelectorError::InvalidToken(_))
        ));
    }
}
